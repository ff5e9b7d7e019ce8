#![no_main]
use std::{borrow::Cow, cell::RefCell};

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use textmend::{FilterOptions, StreamFilter, normalize_line_endings, repair};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// Helper: borrow the thread-local RNG and run a closure with it.
fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// One piece of a mixed-encoding payload.
#[derive(Debug, Arbitrary)]
enum Piece {
    Ascii(u8),
    Char(char),
    HighByte(u8),
    ByteOrderMark,
    ReplacementCharacter,
    /// `EF`, `EF BB` or `EF BF`.
    PartialNoise(u8),
    /// `\r`, `\n` or `\r\n`.
    LineEnding(u8),
    /// A multi-byte sequence cut short.
    Truncated(char, u8),
}

impl Piece {
    fn encode(&self, out: &mut Vec<u8>) {
        let mut buf = [0; 4];
        match *self {
            Piece::Ascii(b) => out.push(b & 0x7F),
            Piece::Char(c) => out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
            Piece::HighByte(b) => out.push(b | 0x80),
            Piece::ByteOrderMark => out.extend_from_slice(b"\xEF\xBB\xBF"),
            Piece::ReplacementCharacter => out.extend_from_slice(b"\xEF\xBF\xBD"),
            Piece::PartialNoise(n) => {
                out.extend_from_slice([&b"\xEF"[..], b"\xEF\xBB", b"\xEF\xBF"][usize::from(n % 3)]);
            }
            Piece::LineEnding(n) => {
                out.extend_from_slice([&b"\r"[..], b"\n", b"\r\n"][usize::from(n % 3)]);
            }
            Piece::Truncated(c, n) => {
                let bytes = c.encode_utf8(&mut buf).as_bytes();
                if bytes.len() > 1 {
                    out.extend_from_slice(&bytes[..1 + usize::from(n) % (bytes.len() - 1)]);
                }
            }
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let budget = with_rng(|rng| rng.random_range(0..=size.max(HEADER) * 2));
        let entropy: Vec<u8> = with_rng(|rng| (0..budget).map(|_| rng.random::<u8>()).collect());
        let pieces: Vec<Piece> = Unstructured::new(&entropy)
            .arbitrary()
            .unwrap_or_default();

        let mut payload = Vec::new();
        for piece in &pieces {
            piece.encode(&mut payload);
        }
        let len = payload.len().min(max_size.saturating_sub(HEADER));
        data[HEADER..HEADER + len].copy_from_slice(&payload[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

fn stream(options: FilterOptions, chunks: &[&[u8]]) -> String {
    let mut filter = StreamFilter::new(options);
    let mut out = String::new();
    for chunk in chunks {
        if let Some(text) = filter.feed(chunk) {
            out.push_str(&text);
        }
    }
    out.push_str(&filter.finish());
    out
}

fn check(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    // Repair is idempotent and its output needs no further repair.
    let whole = repair(data);
    let again = repair(whole.as_bytes());
    assert!(matches!(again, Cow::Borrowed(_)), "repair output was not stable");
    assert_eq!(again, whole);

    // Streaming in any chunking matches whole-buffer repair.
    let chunks = split_into_chunks(data, split_seed);
    let preserve_line_endings = flags & 1 != 0;
    let options = FilterOptions {
        preserve_line_endings,
        ..Default::default()
    };
    let streamed = stream(options, &chunks);
    if preserve_line_endings {
        assert_eq!(streamed, whole);
    } else {
        assert_eq!(streamed, normalize_line_endings(&whole));
    }

    if flags & 2 != 0 {
        let text = textmend::flatten(data).expect("the default backend never fails");
        assert!(text.chars().all(|c| c == '\n' || u32::from(c) >= 0x20));
    }
}

fuzz_target!(|data: &[u8]| check(data));

/// Split `data` into chunks of at least one byte, sized by a deterministic
/// random sequence. Cuts land anywhere, including inside sequences.
fn split_into_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let mut chunks = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let size = rng.random_range(1..=rest.len().min(16));
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    chunks
}
