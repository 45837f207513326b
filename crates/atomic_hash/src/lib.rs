//! Hashing used for every generated identifier: atomic class names, CSS
//! variable names and keyframe names.
//!
//! The algorithm is murmurhash2 (32 bit) with multiplication performed the way
//! a JavaScript engine does it, rendered in base 36. Class names emitted by the
//! compiler have to match names produced by the JavaScript runtime, so the
//! output must stay bit-for-bit stable.

const M: u32 = 0x5bd1_e995;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 32-bit multiply in 16-bit halves, the way the JavaScript implementation
/// keeps intermediate products exact. Equal to a wrapping multiply.
#[inline]
fn js_mul(a: u32, b: u32) -> u32 {
  let low = (a & 0xffff).wrapping_mul(b);
  let high = ((a >> 16).wrapping_mul(b) & 0xffff) << 16;
  low.wrapping_add(high)
}

/// Raw murmurhash2 of `key` with the given `seed`.
///
/// Input is read as UTF-16 code units keeping the low byte of each, the same
/// units `charCodeAt(i) & 0xff` yields in JavaScript.
pub fn murmur2(key: &str, seed: u32) -> u32 {
  let units: Vec<u32> = key.encode_utf16().map(|unit| u32::from(unit & 0xff)).collect();
  let mut h = seed ^ (units.len() as u32);

  let mut chunks = units.chunks_exact(4);
  for chunk in &mut chunks {
    let mut k = chunk[0] | (chunk[1] << 8) | (chunk[2] << 16) | (chunk[3] << 24);
    k = js_mul(k, M);
    k ^= k >> 24;
    k = js_mul(k, M);
    h = js_mul(h, M) ^ k;
  }

  let tail = chunks.remainder();
  if !tail.is_empty() {
    for (index, unit) in tail.iter().enumerate().rev() {
      h ^= unit << (8 * index);
    }
    h = js_mul(h, M);
  }

  h ^= h >> 13;
  h = js_mul(h, M);
  h ^ (h >> 15)
}

fn to_base36(mut value: u32) -> String {
  if value == 0 {
    return "0".into();
  }

  let mut digits = Vec::with_capacity(7);
  while value > 0 {
    digits.push(BASE36_DIGITS[(value % 36) as usize] as char);
    value /= 36;
  }
  digits.iter().rev().collect()
}

/// Hash `key` with seed `0` and render it in base 36.
pub fn hash(key: &str) -> String {
  hash_with_seed(key, 0)
}

pub fn hash_with_seed(key: &str, seed: u32) -> String {
  to_base36(murmur2(key, seed))
}

/// First `len` characters of [`hash`]. Shorter hashes are returned whole.
pub fn short_hash(key: &str, len: usize) -> String {
  hash(key).chars().take(len).collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn matches_declaration_group_hashes() {
    assert_eq!(hash("undefined&color"), "syazsv");
    assert_eq!(hash("undefined&font-size"), "1wyb1t4");
    assert_eq!(hash("undefined&display"), "1e0ca89");
    assert_eq!(hash("undefined&&display"), "if29fb");
    assert_eq!(hash("undefined&text-align"), "y3gnw1");
  }

  #[test]
  fn matches_value_hashes() {
    assert_eq!(hash("blue"), "13q2bts");
    assert_eq!(hash("block"), "1ulexfb");
    assert_eq!(hash("12px"), "1fwxnve");
    assert_eq!(hash("none"), "glywfm");
    assert_eq!(hash("center"), "1h6ojuz");
  }

  #[test]
  fn important_values_hash_with_flag_suffix() {
    assert_eq!(hash("redtrue"), "1qpqmqh");
  }

  #[test]
  fn hashes_pseudo_and_at_rule_contexts() {
    assert_eq!(hash("undefined&:hoveruser-select"), "180hq6f");
    assert_eq!(hash("undefined&:focususer-select"), "1j5pxr4");
    assert_eq!(hash("media(min-width: 30rem)&user-select"), "ufx4c2");
    assert_eq!(hash("media(min-width: 30rem)& divuser-select"), "195xxsm");
    assert_eq!(
      hash("media(min-width: 30rem)media(min-width: 20rem)&user-select"),
      "uf5eh2"
    );
    assert_eq!(hash("container(width > 300px)& h2color"), "eq983t");
  }

  #[test]
  fn hashes_attribute_selectors() {
    assert_eq!(hash("undefined[data-look='h100']&display"), "mi0gz2");
  }

  #[test]
  fn short_hash_truncates() {
    assert_eq!(short_hash("undefined&color", 4), "syaz");
    assert_eq!(short_hash("blue", 4), "13q2");
  }

  #[test]
  fn reads_utf16_units_like_javascript() {
    // U+2192 is one UTF-16 unit whose low byte is 0x92.
    assert_eq!(murmur2("\u{2192}", 0), murmur2("\u{92}", 0));
    assert_ne!(murmur2("\u{2192}", 0), murmur2("\u{2193}", 0));
  }

  #[test]
  fn zero_renders_as_digit() {
    assert_eq!(to_base36(0), "0");
    assert_eq!(to_base36(35), "z");
    assert_eq!(to_base36(36), "10");
  }
}
