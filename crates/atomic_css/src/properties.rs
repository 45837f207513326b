//! Property tables shared by shorthand sorting and property validation.

/// Depth of a shorthand property: lower buckets are broader shorthands and
/// must be emitted before the narrower shorthands and longhands they reset.
/// Properties that are not shorthands have no bucket.
pub fn shorthand_bucket(property: &str) -> Option<u32> {
  let bucket = match property {
    "all" => 0,
    "animation" | "animation-range" | "background" | "border" | "border-image"
    | "border-radius" | "column-rule" | "columns" | "contain-intrinsic-size" | "container"
    | "flex" | "flex-flow" | "font" | "font-synthesis" | "gap" | "grid" | "grid-area"
    | "inset" | "list-style" | "mask" | "mask-border" | "offset" | "outline" | "overflow"
    | "overscroll-behavior" | "padding" | "margin" | "place-content" | "place-items"
    | "place-self" | "position-try" | "scroll-margin" | "scroll-padding" | "scroll-timeline"
    | "text-decoration" | "text-emphasis" | "text-wrap" | "transition" | "view-timeline" => 1,
    "border-color" | "border-style" | "border-width" | "font-variant" | "grid-column"
    | "grid-row" | "grid-template" | "inset-block" | "inset-inline" | "margin-block"
    | "margin-inline" | "padding-block" | "padding-inline" | "scroll-margin-block"
    | "scroll-margin-inline" | "scroll-padding-block" | "scroll-padding-inline" => 2,
    "border-block" | "border-inline" => 3,
    "border-top" | "border-right" | "border-bottom" | "border-left" => 4,
    "border-block-start" | "border-block-end" | "border-inline-start" | "border-inline-end" => 5,
    _ => return None,
  };
  Some(bucket)
}

/// Sort weight for shorthand ordering; longhands and unknown properties sort
/// after every shorthand.
pub fn shorthand_sort_weight(property: &str) -> u32 {
  shorthand_bucket(property).unwrap_or(u32::MAX)
}

/// Longhands directly or transitively reset by `shorthand`.
pub fn longhands_of(shorthand: &str) -> &'static [&'static str] {
  match shorthand {
    "margin" => &["margin-top", "margin-right", "margin-bottom", "margin-left"],
    "padding" => &["padding-top", "padding-right", "padding-bottom", "padding-left"],
    "margin-block" => &["margin-block-start", "margin-block-end"],
    "margin-inline" => &["margin-inline-start", "margin-inline-end"],
    "padding-block" => &["padding-block-start", "padding-block-end"],
    "padding-inline" => &["padding-inline-start", "padding-inline-end"],
    "inset" => &["top", "right", "bottom", "left"],
    "inset-block" => &["inset-block-start", "inset-block-end"],
    "inset-inline" => &["inset-inline-start", "inset-inline-end"],
    "overflow" => &["overflow-x", "overflow-y"],
    "flex" => &["flex-grow", "flex-shrink", "flex-basis"],
    "flex-flow" => &["flex-direction", "flex-wrap"],
    "place-content" => &["align-content", "justify-content"],
    "place-items" => &["align-items", "justify-items"],
    "place-self" => &["align-self", "justify-self"],
    "gap" => &["row-gap", "column-gap"],
    "outline" => &["outline-color", "outline-style", "outline-width"],
    "text-decoration" => &[
      "text-decoration-color",
      "text-decoration-line",
      "text-decoration-style",
      "text-decoration-thickness",
    ],
    "list-style" => &["list-style-image", "list-style-position", "list-style-type"],
    "background" => &[
      "background-attachment",
      "background-clip",
      "background-color",
      "background-image",
      "background-origin",
      "background-position",
      "background-repeat",
      "background-size",
    ],
    "border" => &[
      "border-color",
      "border-style",
      "border-width",
      "border-top",
      "border-right",
      "border-bottom",
      "border-left",
      "border-top-color",
      "border-right-color",
      "border-bottom-color",
      "border-left-color",
      "border-top-style",
      "border-right-style",
      "border-bottom-style",
      "border-left-style",
      "border-top-width",
      "border-right-width",
      "border-bottom-width",
      "border-left-width",
    ],
    "border-color" => &[
      "border-top-color",
      "border-right-color",
      "border-bottom-color",
      "border-left-color",
    ],
    "border-style" => &[
      "border-top-style",
      "border-right-style",
      "border-bottom-style",
      "border-left-style",
    ],
    "border-width" => &[
      "border-top-width",
      "border-right-width",
      "border-bottom-width",
      "border-left-width",
    ],
    "border-top" => &["border-top-color", "border-top-style", "border-top-width"],
    "border-right" => &["border-right-color", "border-right-style", "border-right-width"],
    "border-bottom" => &["border-bottom-color", "border-bottom-style", "border-bottom-width"],
    "border-left" => &["border-left-color", "border-left-style", "border-left-width"],
    "border-radius" => &[
      "border-top-left-radius",
      "border-top-right-radius",
      "border-bottom-right-radius",
      "border-bottom-left-radius",
    ],
    "font" => &[
      "font-family",
      "font-size",
      "font-stretch",
      "font-style",
      "font-variant",
      "font-weight",
      "line-height",
    ],
    "grid-area" => &["grid-row-start", "grid-column-start", "grid-row-end", "grid-column-end"],
    "grid-row" => &["grid-row-start", "grid-row-end"],
    "grid-column" => &["grid-column-start", "grid-column-end"],
    "grid-template" => &["grid-template-rows", "grid-template-columns", "grid-template-areas"],
    "transition" => &[
      "transition-behavior",
      "transition-delay",
      "transition-duration",
      "transition-property",
      "transition-timing-function",
    ],
    "animation" => &[
      "animation-composition",
      "animation-delay",
      "animation-direction",
      "animation-duration",
      "animation-fill-mode",
      "animation-iteration-count",
      "animation-name",
      "animation-play-state",
      "animation-timing-function",
    ],
    "columns" => &["column-count", "column-width"],
    "column-rule" => &["column-rule-color", "column-rule-style", "column-rule-width"],
    _ => &[],
  }
}

/// Properties accepted by the optional validation pass. Custom properties and
/// vendor-prefixed properties are accepted separately.
const KNOWN_PROPERTIES: &[&str] = &[
  "accent-color",
  "align-content",
  "align-items",
  "align-self",
  "all",
  "animation",
  "animation-composition",
  "animation-delay",
  "animation-direction",
  "animation-duration",
  "animation-fill-mode",
  "animation-iteration-count",
  "animation-name",
  "animation-play-state",
  "animation-range",
  "animation-timing-function",
  "appearance",
  "aspect-ratio",
  "backdrop-filter",
  "backface-visibility",
  "background",
  "background-attachment",
  "background-blend-mode",
  "background-clip",
  "background-color",
  "background-image",
  "background-origin",
  "background-position",
  "background-position-x",
  "background-position-y",
  "background-repeat",
  "background-size",
  "block-size",
  "border",
  "border-block",
  "border-block-color",
  "border-block-end",
  "border-block-end-color",
  "border-block-end-style",
  "border-block-end-width",
  "border-block-start",
  "border-block-start-color",
  "border-block-start-style",
  "border-block-start-width",
  "border-block-style",
  "border-block-width",
  "border-bottom",
  "border-bottom-color",
  "border-bottom-left-radius",
  "border-bottom-right-radius",
  "border-bottom-style",
  "border-bottom-width",
  "border-collapse",
  "border-color",
  "border-end-end-radius",
  "border-end-start-radius",
  "border-image",
  "border-image-outset",
  "border-image-repeat",
  "border-image-slice",
  "border-image-source",
  "border-image-width",
  "border-inline",
  "border-inline-color",
  "border-inline-end",
  "border-inline-end-color",
  "border-inline-end-style",
  "border-inline-end-width",
  "border-inline-start",
  "border-inline-start-color",
  "border-inline-start-style",
  "border-inline-start-width",
  "border-inline-style",
  "border-inline-width",
  "border-left",
  "border-left-color",
  "border-left-style",
  "border-left-width",
  "border-radius",
  "border-right",
  "border-right-color",
  "border-right-style",
  "border-right-width",
  "border-spacing",
  "border-start-end-radius",
  "border-start-start-radius",
  "border-style",
  "border-top",
  "border-top-color",
  "border-top-left-radius",
  "border-top-right-radius",
  "border-top-style",
  "border-top-width",
  "border-width",
  "bottom",
  "box-decoration-break",
  "box-shadow",
  "box-sizing",
  "break-after",
  "break-before",
  "break-inside",
  "caption-side",
  "caret-color",
  "clear",
  "clip",
  "clip-path",
  "color",
  "color-scheme",
  "column-count",
  "column-fill",
  "column-gap",
  "column-rule",
  "column-rule-color",
  "column-rule-style",
  "column-rule-width",
  "column-span",
  "column-width",
  "columns",
  "contain",
  "contain-intrinsic-size",
  "container",
  "container-name",
  "container-type",
  "content",
  "content-visibility",
  "counter-increment",
  "counter-reset",
  "counter-set",
  "cursor",
  "direction",
  "display",
  "empty-cells",
  "fill",
  "filter",
  "flex",
  "flex-basis",
  "flex-direction",
  "flex-flow",
  "flex-grow",
  "flex-shrink",
  "flex-wrap",
  "float",
  "font",
  "font-family",
  "font-feature-settings",
  "font-kerning",
  "font-optical-sizing",
  "font-size",
  "font-size-adjust",
  "font-stretch",
  "font-style",
  "font-synthesis",
  "font-variant",
  "font-variant-caps",
  "font-variant-east-asian",
  "font-variant-ligatures",
  "font-variant-numeric",
  "font-variant-position",
  "font-variation-settings",
  "font-weight",
  "forced-color-adjust",
  "gap",
  "grid",
  "grid-area",
  "grid-auto-columns",
  "grid-auto-flow",
  "grid-auto-rows",
  "grid-column",
  "grid-column-end",
  "grid-column-start",
  "grid-row",
  "grid-row-end",
  "grid-row-start",
  "grid-template",
  "grid-template-areas",
  "grid-template-columns",
  "grid-template-rows",
  "height",
  "hyphens",
  "image-rendering",
  "inline-size",
  "inset",
  "inset-block",
  "inset-block-end",
  "inset-block-start",
  "inset-inline",
  "inset-inline-end",
  "inset-inline-start",
  "isolation",
  "justify-content",
  "justify-items",
  "justify-self",
  "left",
  "letter-spacing",
  "line-break",
  "line-clamp",
  "line-height",
  "list-style",
  "list-style-image",
  "list-style-position",
  "list-style-type",
  "margin",
  "margin-block",
  "margin-block-end",
  "margin-block-start",
  "margin-bottom",
  "margin-inline",
  "margin-inline-end",
  "margin-inline-start",
  "margin-left",
  "margin-right",
  "margin-top",
  "mask",
  "mask-image",
  "mask-position",
  "mask-repeat",
  "mask-size",
  "max-block-size",
  "max-height",
  "max-inline-size",
  "max-width",
  "min-block-size",
  "min-height",
  "min-inline-size",
  "min-width",
  "mix-blend-mode",
  "object-fit",
  "object-position",
  "offset",
  "opacity",
  "order",
  "orphans",
  "outline",
  "outline-color",
  "outline-offset",
  "outline-style",
  "outline-width",
  "overflow",
  "overflow-anchor",
  "overflow-wrap",
  "overflow-x",
  "overflow-y",
  "overscroll-behavior",
  "overscroll-behavior-x",
  "overscroll-behavior-y",
  "padding",
  "padding-block",
  "padding-block-end",
  "padding-block-start",
  "padding-bottom",
  "padding-inline",
  "padding-inline-end",
  "padding-inline-start",
  "padding-left",
  "padding-right",
  "padding-top",
  "page-break-after",
  "page-break-before",
  "page-break-inside",
  "perspective",
  "perspective-origin",
  "place-content",
  "place-items",
  "place-self",
  "pointer-events",
  "position",
  "print-color-adjust",
  "quotes",
  "resize",
  "right",
  "rotate",
  "row-gap",
  "scale",
  "scroll-behavior",
  "scroll-margin",
  "scroll-margin-block",
  "scroll-margin-bottom",
  "scroll-margin-inline",
  "scroll-margin-left",
  "scroll-margin-right",
  "scroll-margin-top",
  "scroll-padding",
  "scroll-padding-block",
  "scroll-padding-bottom",
  "scroll-padding-inline",
  "scroll-padding-left",
  "scroll-padding-right",
  "scroll-padding-top",
  "scroll-snap-align",
  "scroll-snap-stop",
  "scroll-snap-type",
  "scrollbar-color",
  "scrollbar-gutter",
  "scrollbar-width",
  "shape-outside",
  "stroke",
  "stroke-width",
  "tab-size",
  "table-layout",
  "text-align",
  "text-align-last",
  "text-combine-upright",
  "text-decoration",
  "text-decoration-color",
  "text-decoration-line",
  "text-decoration-skip-ink",
  "text-decoration-style",
  "text-decoration-thickness",
  "text-emphasis",
  "text-indent",
  "text-justify",
  "text-orientation",
  "text-overflow",
  "text-rendering",
  "text-shadow",
  "text-size-adjust",
  "text-transform",
  "text-underline-offset",
  "text-underline-position",
  "text-wrap",
  "top",
  "touch-action",
  "transform",
  "transform-box",
  "transform-origin",
  "transform-style",
  "transition",
  "transition-behavior",
  "transition-delay",
  "transition-duration",
  "transition-property",
  "transition-timing-function",
  "translate",
  "unicode-bidi",
  "user-select",
  "vertical-align",
  "view-transition-name",
  "visibility",
  "white-space",
  "white-space-collapse",
  "widows",
  "width",
  "will-change",
  "word-break",
  "word-spacing",
  "word-wrap",
  "writing-mode",
  "z-index",
  "zoom",
];

pub fn is_known_property(property: &str) -> bool {
  property.starts_with("--")
    || property.starts_with('-')
    || KNOWN_PROPERTIES.binary_search(&property).is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_properties_are_sorted_for_binary_search() {
    assert!(KNOWN_PROPERTIES.windows(2).all(|pair| pair[0] < pair[1]));
  }

  #[test]
  fn recognizes_custom_and_vendor_properties() {
    assert!(is_known_property("--_1xlms2"));
    assert!(is_known_property("-webkit-line-clamp"));
    assert!(is_known_property("color"));
    assert!(!is_known_property("colour"));
  }

  #[test]
  fn longhands_sort_after_their_shorthands() {
    assert!(shorthand_sort_weight("border") < shorthand_sort_weight("border-top"));
    assert!(shorthand_sort_weight("border-top") < shorthand_sort_weight("border-top-color"));
    assert!(shorthand_sort_weight("margin") < shorthand_sort_weight("margin-top"));
    assert_eq!(shorthand_sort_weight("all"), 0);
  }
}
