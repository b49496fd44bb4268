use std::io::Write;

use oggstrip::ogg::writer::PageBuilder;
use oggstrip::ogg::{OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS};
use oggstrip::opus::comment_packet;
use oggstrip::{
    read_page_header, ByteSource, DemuxError, Demuxer, FileSource, IdentificationHeader, MemorySource,
    PageHeader, MAX_SEGMENT_LEN,
};

/// Two header pages, then `frames` spread over pages of `per_page` packets
fn opus_file(frames: &[Vec<u8>], per_page: usize) -> Vec<u8> {
    let serial = 0x0BAD_F00D;
    let mut bytes = PageBuilder::new()
        .header_type(OGG_HEADER_TYPE_BOS)
        .serial(serial)
        .laced_packet(&IdentificationHeader::new(1, 3840, 16_000, 0, 0).to_bytes())
        .build();
    bytes.extend_from_slice(
        &PageBuilder::new()
            .serial(serial)
            .sequence(1)
            .laced_packet(&comment_packet("integration", &["ENCODER=test", "TITLE=Sweep"]))
            .build(),
    );

    let chunks: Vec<&[Vec<u8>]> = frames.chunks(per_page).collect();
    for (i, chunk) in chunks.iter().enumerate() {
        let mut page = PageBuilder::new()
            .serial(serial)
            .sequence(i as u32 + 2)
            .granule_position(960 * (i as u64 + 1) * per_page as u64);
        if i + 1 == chunks.len() {
            page = page.header_type(OGG_HEADER_TYPE_EOS);
        }
        for frame in chunk.iter() {
            page = page.segment(frame);
        }
        bytes.extend_from_slice(&page.build());
    }
    bytes
}

fn frames() -> Vec<Vec<u8>> {
    (0..23u8).map(|i| vec![i; 20 + i as usize * 9]).collect()
}

#[test]
fn file_source_yields_every_frame() {
    let frames = frames();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&opus_file(&frames, 5)).unwrap();
    file.flush().unwrap();

    let mut demuxer = Demuxer::with_source(FileSource::open(file.path()).unwrap());
    assert!(demuxer.prepare());
    assert_eq!(demuxer.identification_header().pre_skip(), 3840);
    assert_eq!(demuxer.identification_header().input_sample_rate(), 16_000);

    let mut buf = [0u8; MAX_SEGMENT_LEN];
    for frame in &frames {
        let len = demuxer.next_packet(&mut buf).unwrap();
        assert_eq!(&buf[..len], frame.as_slice());
    }
    assert!(demuxer.last_page_header().is_eos());
    assert!(matches!(demuxer.next_packet(&mut buf), Err(DemuxError::EndOfInput)));
}

#[test]
fn file_and_memory_sources_agree() {
    let bytes = opus_file(&frames(), 4);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let mut from_file = Demuxer::with_source(FileSource::open(file.path()).unwrap());
    let mut from_memory = Demuxer::with_source(MemorySource::new(&bytes));
    assert!(from_file.prepare());
    assert!(from_memory.prepare());

    let mut a = [0u8; MAX_SEGMENT_LEN];
    let mut b = [0u8; MAX_SEGMENT_LEN];
    loop {
        match (from_file.next_packet(&mut a), from_memory.next_packet(&mut b)) {
            (Ok(x), Ok(y)) => {
                assert_eq!(&a[..x], &b[..y]);
                assert_eq!(
                    from_file.last_page_header().granule_position(),
                    from_memory.last_page_header().granule_position()
                );
            }
            (Err(DemuxError::EndOfInput), Err(DemuxError::EndOfInput)) => break,
            other => panic!("sources diverged: {:?}", other),
        }
    }
}

#[test]
fn memory_length_bound_cuts_the_stream() {
    let bytes = opus_file(&frames(), 23);
    let header_pages = {
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();
        let first = read_page_header(&mut source, &mut header).unwrap();
        source.seek_relative(first as i64).unwrap();
        let second = read_page_header(&mut source, &mut header).unwrap();
        source.position() + second
    };

    // Bound the region right after the comment page.
    let mut demuxer = Demuxer::with_source(MemorySource::with_length(&bytes, header_pages));
    assert!(demuxer.prepare());
    let mut buf = [0u8; MAX_SEGMENT_LEN];
    assert!(matches!(demuxer.next_packet(&mut buf), Err(DemuxError::EndOfInput)));
}
