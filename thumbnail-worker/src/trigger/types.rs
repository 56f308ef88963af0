//! Wire shapes for the supported trigger transports
//!
//! Only the fields the resolver reads are modeled; everything else in the
//! notification payloads is ignored during deserialization.

use serde::Deserialize;

/// Direct storage-change notification
#[derive(Debug, Deserialize)]
pub struct S3Event {
    /// Ordered change records; absent means zero records
    #[serde(rename = "Records", default)]
    pub records: Vec<S3Record>,
}

/// One storage-change record
#[derive(Debug, Deserialize)]
pub struct S3Record {
    /// The changed entity
    pub s3: S3Entity,
}

/// Bucket/object pair inside a change record
#[derive(Debug, Deserialize)]
pub struct S3Entity {
    /// Bucket holding the changed object
    pub bucket: S3Bucket,
    /// The changed object
    pub object: S3Object,
}

/// Bucket portion of a change record
#[derive(Debug, Deserialize)]
pub struct S3Bucket {
    /// Bucket name
    pub name: String,
}

/// Object portion of a change record
#[derive(Debug, Deserialize)]
pub struct S3Object {
    /// Object key
    pub key: String,
}

/// Queue envelope; each message body is a serialized [`S3Event`]
#[derive(Debug, Deserialize)]
pub struct SqsEnvelope {
    /// Ordered queue messages
    #[serde(rename = "Records", default)]
    pub records: Vec<SqsRecord>,
}

/// One queue message
#[derive(Debug, Deserialize)]
pub struct SqsRecord {
    /// Serialized storage notification
    pub body: String,
}

/// Pub/sub envelope; one indirection deeper than the queue shape
#[derive(Debug, Deserialize)]
pub struct SnsEnvelope {
    /// Ordered pub/sub records
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

/// One pub/sub record
#[derive(Debug, Deserialize)]
pub struct SnsRecord {
    /// The published message
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

/// Message portion of a pub/sub record
#[derive(Debug, Deserialize)]
pub struct SnsMessage {
    /// Serialized storage notification
    #[serde(rename = "Message")]
    pub message: String,
}
