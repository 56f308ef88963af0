// End-to-end pipeline tests against the in-memory object store.

use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use image::GenericImageView;
use object_store::memory::InMemoryStore;
use object_store::ObjectRef;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use thumbnail_worker::pipeline::{Pipeline, PipelineError, TransformMode};
use thumbnail_worker::trigger::{TriggerError, TriggerKind};

fn png_fixture(width: u32, height: u32) -> Bytes {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([64, 128, 192]),
    ));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .expect("fixture encodes");
    Bytes::from(buf)
}

fn notification(entries: &[(&str, &str)]) -> Value {
    let records: Vec<Value> = entries
        .iter()
        .map(|(bucket, key)| {
            json!({
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket },
                    "object": { "key": key }
                }
            })
        })
        .collect();
    json!({ "Records": records })
}

fn sns_wrap(message: &Value) -> Value {
    json!({
        "Records": [{
            "EventSource": "aws:sns",
            "Sns": { "MessageId": "m-1", "Message": message.to_string() }
        }]
    })
}

fn reference(bucket: &str, key: &str) -> ObjectRef {
    ObjectRef::new(bucket.to_string(), key.to_string())
}

fn pipeline(store: Arc<InMemoryStore>, trigger: TriggerKind) -> Pipeline<InMemoryStore> {
    Pipeline::new(store, trigger, TransformMode::Thumbnail, 1)
}

#[tokio::test]
async fn direct_notification_produces_thumbnail() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(&reference("photos", "vacation/beach.jpg"), png_fixture(320, 240))
        .await;

    let summary = pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&notification(&[("photos", "vacation/beach.jpg")]))
        .await?;

    assert_eq!(summary.succeeded, 1);

    let thumbnail = store
        .content(&reference("photos", "thumbnails/beach_thumbnail.png"))
        .await
        .context("thumbnail was not stored")?;

    let decoded = image::load_from_memory(&thumbnail)?;
    assert_eq!(decoded.dimensions(), (80, 80));
    assert_eq!(&thumbnail[..4], &[0x89, b'P', b'N', b'G']);

    Ok(())
}

#[tokio::test]
async fn missing_object_fails_without_uploading() {
    let store = Arc::new(InMemoryStore::new());

    let err = pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&notification(&[("photos", "vacation/beach.jpg")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Partial {
            failed: 1,
            total: 1
        }
    ));
    assert_eq!(store.object_count().await, 0);
}

#[tokio::test]
async fn key_without_extension_still_derives_png_name() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(&reference("photos", "uploads/img"), png_fixture(100, 100))
        .await;

    pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&notification(&[("photos", "uploads/img")]))
        .await?;

    assert!(store
        .content(&reference("photos", "thumbnails/img_thumbnail.png"))
        .await
        .is_some());

    Ok(())
}

#[tokio::test]
async fn unparseable_queue_body_is_malformed_and_touches_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let payload = json!({
        "Records": [{ "messageId": "m-1", "body": "{definitely not json" }]
    });

    let err = pipeline(Arc::clone(&store), TriggerKind::Sqs)
        .run(&payload)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Trigger(TriggerError::MalformedEnvelope(_))
    ));
    assert_eq!(store.object_count().await, 0);
}

#[tokio::test]
async fn pubsub_wrapped_notification_produces_thumbnail() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(&reference("photos", "vacation/beach.jpg"), png_fixture(640, 480))
        .await;

    let payload = sns_wrap(&notification(&[("photos", "vacation/beach.jpg")]));
    let summary = pipeline(Arc::clone(&store), TriggerKind::Sns)
        .run(&payload)
        .await?;

    assert_eq!(summary.succeeded, 1);
    assert!(store
        .content(&reference("photos", "thumbnails/beach_thumbnail.png"))
        .await
        .is_some());

    Ok(())
}

#[tokio::test]
async fn failed_reference_does_not_block_siblings() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(&reference("photos", "a.png"), png_fixture(200, 200))
        .await;

    // b.png is never inserted; its fetch fails while a.png still completes.
    let err = pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&notification(&[("photos", "a.png"), ("photos", "b.png")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Partial {
            failed: 1,
            total: 2
        }
    ));
    assert!(store
        .content(&reference("photos", "thumbnails/a_thumbnail.png"))
        .await
        .is_some());

    Ok(())
}

#[tokio::test]
async fn reprocessing_converges_on_the_same_destination() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(&reference("photos", "vacation/beach.jpg"), png_fixture(320, 240))
        .await;

    let payload = notification(&[("photos", "vacation/beach.jpg")]);
    let worker = pipeline(Arc::clone(&store), TriggerKind::S3);

    worker.run(&payload).await?;
    let first = store
        .content(&reference("photos", "thumbnails/beach_thumbnail.png"))
        .await
        .context("thumbnail was not stored")?;

    // Redelivery overwrites the same key rather than accumulating copies.
    worker.run(&payload).await?;
    assert_eq!(store.object_count().await, 2);
    let second = store
        .content(&reference("photos", "thumbnails/beach_thumbnail.png"))
        .await
        .context("thumbnail was not stored")?;
    assert_eq!(first, second);

    Ok(())
}

#[tokio::test]
async fn corrupt_bitmap_is_a_permanent_failure() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert(
            &reference("photos", "notes/readme.txt"),
            Bytes::from_static(b"plain text, not pixels"),
        )
        .await;

    let err = pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&notification(&[("photos", "notes/readme.txt")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Partial {
            failed: 1,
            total: 1
        }
    ));
    // Only the seeded source object remains.
    assert_eq!(store.object_count().await, 1);
}

#[tokio::test]
async fn copy_mode_passes_bytes_through_under_original_name() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let original = Bytes::from_static(b"opaque-bytes-left-untouched");
    store
        .insert(&reference("photos", "exports/report.pdf"), original.clone())
        .await;

    let worker = Pipeline::new(Arc::clone(&store), TriggerKind::S3, TransformMode::Copy, 1);
    worker
        .run(&notification(&[("photos", "exports/report.pdf")]))
        .await?;

    let copied = store
        .content(&reference("photos", "thumbnails/report.pdf"))
        .await
        .context("copy was not stored")?;
    assert_eq!(copied, original);

    Ok(())
}

#[tokio::test]
async fn zero_record_envelope_succeeds_with_nothing_to_do() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());

    let summary = pipeline(Arc::clone(&store), TriggerKind::S3)
        .run(&json!({ "Records": [] }))
        .await?;

    assert_eq!(summary.succeeded, 0);
    assert_eq!(store.object_count().await, 0);

    Ok(())
}

#[tokio::test]
async fn bounded_parallelism_processes_every_reference() -> Result<()> {
    let store = Arc::new(InMemoryStore::new());
    let keys = ["a.png", "b.png", "c.png", "d.png", "e.png"];
    for key in keys {
        store
            .insert(&reference("photos", key), png_fixture(120, 90))
            .await;
    }

    let entries: Vec<(&str, &str)> = keys.iter().map(|&key| ("photos", key)).collect();
    let worker = Pipeline::new(
        Arc::clone(&store),
        TriggerKind::S3,
        TransformMode::Thumbnail,
        4,
    );

    let summary = worker.run(&notification(&entries)).await?;

    assert_eq!(summary.succeeded, keys.len());
    for key in keys {
        let stem = key.trim_end_matches(".png");
        assert!(store
            .content(&reference("photos", &format!("thumbnails/{stem}_thumbnail.png")))
            .await
            .is_some());
    }

    Ok(())
}
