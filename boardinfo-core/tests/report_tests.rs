#![allow(missing_docs)]
use boardinfo_core::report::{self, OtpImage};
use boardinfo_core::{
    BoardInfoError, OTP_WORDS, Record, TouchedWord, WORD_BYTES, decode_and_report, encode,
};

#[test]
fn test_serial_only_report() {
    let buffer = encode(Some(0x1234_5678), None, None, None).expect("record encodes");
    let touched = decode_and_report(&buffer).expect("record fits");
    assert_eq!(
        touched,
        vec![
            TouchedWord {
                index: 0x7FE,
                value: 0x1234_5678
            },
            TouchedWord {
                index: 0x7FF,
                value: 0x0427_FFFF
            },
        ]
    );
    assert_eq!(
        report::render(&touched),
        "*,0x7FE,0x12345678\n*,0x7FF,0x0427FFFF\n"
    );
}

#[test]
fn test_full_record_report() {
    let buffer = encode(
        Some(0x1234_5678),
        Some(&["12:34:56:78:9A:BC"][..]),
        Some(0xCAFE),
        Some("XK"),
    )
    .expect("record encodes");
    let touched = decode_and_report(&buffer).expect("record fits");
    assert_eq!(
        report::render(&touched),
        "*,0x7FA,0x584B0000\n\
         *,0x7FB,0x0000CAFE\n\
         *,0x7FC,0x12345678\n\
         *,0x7FD,0x56789ABC\n\
         *,0x7FE,0x00001234\n\
         *,0x7FF,0x0C7FFFFF\n"
    );
}

#[test]
fn test_padding_and_blank_values_are_not_reported() {
    // serial + board id + header is padded to four words
    let buffer = encode(Some(0xA5A5_A5A5), None, Some(0x5A5A_5A5A), None).expect("record encodes");
    assert_eq!(buffer.len(), 4 * WORD_BYTES);
    let touched = decode_and_report(&buffer).expect("record fits");
    assert_eq!(touched.len(), 3);
    assert!(touched.iter().all(|word| word.index > 0x7FC));

    // a serial number equal to the blank value of its cell is indistinguishable from blank
    let buffer = encode(Some(0), None, None, None).expect("record encodes");
    let touched = decode_and_report(&buffer).expect("record fits");
    assert_eq!(
        touched,
        vec![TouchedWord {
            index: 0x7FF,
            value: 0x0427_FFFF
        }]
    );
}

#[test]
fn test_touched_words_lie_inside_record() {
    let record = Record::from_fields(
        Some(7),
        Some(&["02:00:00:00:00:01", "02:00:00:00:00:02"][..]),
        Some(9),
        Some("board"),
    )
    .expect("fields parse");
    let words = record.word_count().expect("record fits header");
    let touched = decode_and_report(&record.encode().expect("record encodes")).expect("record fits");

    assert!(touched.len() <= words);
    let first = u32::try_from(OTP_WORDS - words).expect("index fits u32");
    assert!(touched.iter().all(|word| word.index >= first));
    assert!(touched.windows(2).all(|pair| pair[0].index < pair[1].index));
}

#[test]
fn test_decode_is_repeatable() {
    let buffer = encode(Some(1), Some(&["12:34:56:78:9A:BC"][..]), None, Some("rpt"))
        .expect("record encodes");
    let first = decode_and_report(&buffer).expect("record fits");
    let second = decode_and_report(&buffer).expect("record fits");
    assert_eq!(first, second);
    assert_eq!(report::render(&first), report::render(&second));
}

#[test]
fn test_smaller_image_shifts_indices() {
    let buffer = encode(Some(0x1234_5678), None, None, None).expect("record encodes");
    let touched = report::diff(&buffer, 4).expect("record fits");
    assert_eq!(
        report::render(&touched),
        "*,0x002,0x12345678\n*,0x003,0x0427FFFF\n"
    );
}

#[test]
fn test_odd_sized_image_reports_same_words() {
    // one MAC: blank padding word, two MAC words, header
    let buffer =
        encode(None, Some(&["12:34:56:78:9A:BC"][..]), None, None).expect("record encodes");

    let even = report::diff(&buffer, 6).expect("record fits");
    assert_eq!(
        report::render(&even),
        "*,0x003,0x56789ABC\n*,0x004,0x00001234\n*,0x005,0x0847FFFF\n"
    );

    let odd = report::diff(&buffer, 7).expect("record fits");
    assert_eq!(
        report::render(&odd),
        "*,0x004,0x56789ABC\n*,0x005,0x00001234\n*,0x006,0x0847FFFF\n"
    );

    let blank = report::diff(&[], 7).expect("empty buffer fits");
    assert!(blank.is_empty());
}

#[test]
fn test_buffer_larger_than_image() {
    let buffer = vec![0u8; OTP_WORDS * WORD_BYTES + 1];
    assert_eq!(
        decode_and_report(&buffer),
        Err(BoardInfoError::BufferTooLarge {
            len: OTP_WORDS * WORD_BYTES + 1,
            capacity: OTP_WORDS * WORD_BYTES,
        })
    );

    let buffer = encode(Some(1), None, None, None).expect("record encodes");
    assert!(report::diff(&buffer, 1).is_err());
}

#[test]
fn test_image_holds_record_at_tail() {
    let buffer = encode(None, None, Some(0x00C0_FFEE), None).expect("record encodes");
    let mut image = OtpImage::blank(OTP_WORDS);
    image.overlay_tail(&buffer).expect("record fits");
    assert_eq!(image.word(OTP_WORDS - 2), Some(0x00C0_FFEE));
    assert_eq!(image.word(OTP_WORDS - 1), Some(0x0417_FFFF));
    assert_eq!(image.word(0), Some(0));
    assert_eq!(image.word(1), Some(u32::MAX));

    let dump: Vec<u8> = (0..OTP_WORDS)
        .filter_map(|index| image.word(index))
        .flat_map(u32::to_le_bytes)
        .collect();
    assert_eq!(
        Record::decode(&dump).expect("dump parses").board_id,
        Some(0x00C0_FFEE)
    );
}
