//! Thumbnail URL derived from a food's image URL.
//!
//! The mobile bucket sits next to the full-size one: the image URL up to its
//! last `-`, then `-gorestaurant-mobile/`, then one of three preview names.
//! The preview is picked by the number at the end of the image's file stem
//! (`food2.png` → 2, counted from 1 and wrapping every three). Images with no
//! such number fall back to a stable FNV-1a hash of the URL.

pub const THUMBNAIL_TOKENS: [&str; 3] = ["ao_molho", "veggie", "camarao"];

const MOBILE_SEGMENT: &str = "-gorestaurant-mobile/";

pub fn thumbnail_url(image_url: &str) -> String {
    format!(
        "{}{MOBILE_SEGMENT}{}",
        prefix(image_url),
        THUMBNAIL_TOKENS[token_index(image_url)]
    )
}

fn prefix(image_url: &str) -> &str {
    image_url
        .rfind('-')
        .or_else(|| image_url.rfind('/'))
        .map_or(image_url, |end| &image_url[..end])
}

fn token_index(image_url: &str) -> usize {
    let len = THUMBNAIL_TOKENS.len() as u64;
    let index = match trailing_number(image_url) {
        Some(n) => (n % len + len - 1) % len,
        None => fnv1a(image_url.as_bytes()) % len,
    };
    index as usize
}

/// Digits at the end of the last path segment, ignoring query, fragment and
/// file extension.
fn trailing_number(image_url: &str) -> Option<u64> {
    let path = image_url.split(['?', '#']).next().unwrap_or(image_url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    stem[stem.len() - digits..].parse().ok()
}

/// 64-bit FNV-1a (offset basis `0xcbf29ce484222325`, prime `0x100000001b3`).
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(*byte)).wrapping_mul(PRIME))
}
