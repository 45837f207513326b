use super::values::split_value;
use super::Expansion;

/// `margin` and `padding`: one to four values for top, right, bottom, left.
pub fn box_edges(property: &str, value: &str) -> Expansion {
  let parts = match split_value(value) {
    Some(parts) if (1..=4).contains(&parts.len()) => parts,
    _ => return Expansion::KeepOriginal,
  };

  let top = parts[0];
  let right = parts.get(1).copied().unwrap_or(top);
  let bottom = parts.get(2).copied().unwrap_or(top);
  let left = parts.get(3).copied().unwrap_or(right);

  Expansion::longhands([
    (format!("{property}-top"), top),
    (format!("{property}-right"), right),
    (format!("{property}-bottom"), bottom),
    (format!("{property}-left"), left),
  ])
}

/// `overflow: x [y]`.
pub fn overflow(value: &str) -> Expansion {
  match split_value(value).as_deref() {
    Some([both]) => Expansion::longhands([("overflow-x", *both), ("overflow-y", *both)]),
    Some([x, y]) => Expansion::longhands([("overflow-x", *x), ("overflow-y", *y)]),
    _ => Expansion::KeepOriginal,
  }
}

/// `place-content`, `place-items` and `place-self`: `align [justify]`.
pub fn place(property: &str, value: &str) -> Expansion {
  let suffix = match property.strip_prefix("place-") {
    Some(suffix) => suffix,
    None => return Expansion::KeepOriginal,
  };
  let align = format!("align-{suffix}");
  let justify = format!("justify-{suffix}");

  match split_value(value).as_deref() {
    Some([single]) => {
      if suffix == "content" && matches!(*single, "left" | "right" | "baseline") {
        return Expansion::Discard;
      }
      Expansion::longhands([(align, *single), (justify, *single)])
    }
    Some([first, second]) => Expansion::longhands([(align, *first), (justify, *second)]),
    _ => Expansion::KeepOriginal,
  }
}
