use std::thread;

use bytes::BytesMut;
use slurm_wire::protocol::{Cursor, decode_body};
use slurm_wire::{
    Body, CodecConfig, Error, FrameCodec, FrameHeader, HEADER_SIZE, JobDescriptor, JobListing,
    JobRecord, Message, MessageType, NodeBitmap, NodeListing, NodeRecord, PartitionListing,
    PartitionRecord,
};

fn job(job_id: u32, nodes: &str) -> JobRecord {
    JobRecord {
        job_id,
        user_id: 1500,
        job_state: 1,
        nodes: format!("lx[{nodes}]"),
        partition: "batch".into(),
        name: format!("job{job_id}"),
        node_bitmap: nodes.parse().expect("valid range"),
        num_procs: 4,
        num_nodes: 2,
        ..JobRecord::default()
    }
}

#[test]
fn return_code_zero_is_four_zero_bytes() {
    let bytes = Message::return_code(0).encode().unwrap();
    assert_eq!(&bytes[HEADER_SIZE..], &[0, 0, 0, 0]);

    let header = FrameHeader::from_bytes(&bytes).unwrap();
    assert_eq!(header.message_type(), Some(MessageType::ResponseSlurmRc));
    assert_eq!(header.body_length, 4);
}

#[test]
fn empty_job_listing_frame() {
    let msg = Message::new(MessageType::ResponseJobInfo, JobListing::new(42, Vec::new())).unwrap();
    let bytes = msg.encode().unwrap();
    assert_eq!(bytes.len(), HEADER_SIZE + 8);
    assert_eq!(&bytes[HEADER_SIZE..], &[0, 0, 0, 0, 0, 0, 0, 42]);

    match Message::decode(&bytes).unwrap().into_body() {
        Body::JobInfo(listing) => {
            assert_eq!(listing.last_update, 42);
            assert!(listing.entries.is_empty());
        }
        other => panic!("unexpected body {other:?}"),
    }
}

#[test]
fn job_table_roundtrip_keeps_both_bitmaps() {
    let mut record = job(7, "0-3,7");
    record.req_nodes = "lx7".into();
    record.req_node_bitmap = NodeBitmap::expand("7").unwrap();

    let msg = Message::new(
        MessageType::ResponseJobInfo,
        JobListing::new(1_700_000_000, vec![record, job(8, "4-6")]),
    )
    .unwrap();

    let decoded = Message::decode(&msg.encode().unwrap()).unwrap();
    assert_eq!(decoded, msg);

    let Body::JobInfo(listing) = decoded.into_body() else {
        panic!("expected a job table");
    };
    assert_eq!(listing.entries[0].node_bitmap.to_string(), "0-3,7");
    assert_eq!(listing.entries[0].req_node_bitmap.to_string(), "7");
    assert!(listing.entries[1].req_node_bitmap.is_empty());
}

#[test]
fn submit_batch_job_roundtrip() {
    let desc = JobDescriptor {
        name: "sleep".into(),
        partition: "debug".into(),
        job_script: "#!/bin/sh\nsleep 10\n".into(),
        num_procs: 1,
        user_id: 1000,
        ..JobDescriptor::default()
    };
    let msg = Message::new(MessageType::RequestSubmitBatchJob, desc).unwrap();
    assert_eq!(Message::decode(&msg.encode().unwrap()).unwrap(), msg);
}

#[test]
fn unknown_tag_is_rejected_without_consuming() {
    let body = [0u8; 8];
    let mut cursor = Cursor::new(&body[..]);
    let result = decode_body(9999, &mut cursor);
    assert_eq!(result, Err(Error::UnsupportedMessageType { msg_type: 9999 }));
    assert_eq!(cursor.position(), 0);
}

#[test]
fn body_shape_checked_at_construction() {
    let result = Message::new(MessageType::ResponseNodeInfo, JobListing::default());
    assert!(matches!(result, Err(Error::BodyMismatch { msg_type: 2008, .. })));
}

#[test]
fn stream_of_mixed_frames() {
    let codec = FrameCodec::default();
    let messages = vec![
        Message::empty(MessageType::RequestReconfigure).unwrap(),
        Message::new(
            MessageType::ResponseNodeInfo,
            NodeListing::new(
                3,
                vec![NodeRecord {
                    name: "lx01".into(),
                    cpus: 16,
                    ..NodeRecord::default()
                }],
            ),
        )
        .unwrap(),
        Message::new(
            MessageType::ResponsePartitionInfo,
            PartitionListing::new(
                4,
                vec![PartitionRecord {
                    name: "batch".into(),
                    nodes: "lx[00-15]".into(),
                    node_bitmap: NodeBitmap::expand("0-15").unwrap(),
                    ..PartitionRecord::default()
                }],
            ),
        )
        .unwrap(),
        Message::return_code(-1),
    ];

    let mut wire = BytesMut::new();
    for msg in &messages {
        codec.encode_to(msg, &mut wire).unwrap();
    }

    let mut src = BytesMut::new();
    let mut received = Vec::new();
    for chunk in wire.chunks(7) {
        src.extend_from_slice(chunk);
        while let Some(msg) = codec.decode_stream(&mut src).unwrap() {
            received.push(msg);
        }
    }

    assert_eq!(received, messages);
    assert!(src.is_empty());
}

#[test]
fn oversized_stream_header_rejected_before_buffering() {
    let codec = FrameCodec::new(CodecConfig::default().with_max_body_len(1024));
    let mut src = BytesMut::new();
    src.extend_from_slice(&FrameHeader::new(MessageType::ResponseJobInfo, 1 << 20).to_bytes());

    let err = codec.decode_stream(&mut src).unwrap_err();
    assert_eq!(
        err,
        Error::BodyTooLarge {
            size: 1 << 20,
            max: 1024,
        }
    );
    assert_eq!(src.len(), HEADER_SIZE);
}

#[test]
fn concurrent_codecs_share_nothing() {
    let handles: Vec<_> = (0..8u32)
        .map(|worker| {
            thread::spawn(move || {
                let codec = FrameCodec::default();
                for i in 0..200 {
                    let msg = Message::new(
                        MessageType::ResponseJobInfo,
                        JobListing::new(i, vec![job(worker * 1000 + i, "0-3")]),
                    )
                    .unwrap();
                    let bytes = codec.encode(&msg).unwrap();
                    assert_eq!(codec.decode(&bytes).unwrap(), msg);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
