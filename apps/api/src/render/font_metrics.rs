//! Static font-metric tables for the renderer's typefaces.
//!
//! Character widths are in em units (relative to font size). The Helvetica
//! tables are the standard AFM advance widths; the Inter tables are
//! approximations. The same table also supplies the `/Widths` array of the
//! embedded font, so layout and glyph placement agree.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

// ────────────────────────────────────────────────────────────────────────────
// Font selection
// ────────────────────────────────────────────────────────────────────────────

/// Typeface families known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// Preferred typeface, embedded from TrueType files when available.
    Inter,
    /// PDF standard font, always available without embedding.
    Helvetica,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// `widths[i]` = width of ASCII character `(i + 32)`, covering 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
#[derive(Debug)]
pub struct FontMetricTable {
    pub weight: Weight,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of a single character in em units. Non-ASCII falls back to `average_char_width`.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    /// Measures the rendered width of a string in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    /// PDF `/Widths` entry (thousandths of an em) for a single-byte code.
    pub fn pdf_width(&self, code: u8) -> i64 {
        let em = match code {
            32..=126 => self.widths[code as usize - 32],
            0x95 => 0.35, // bullet
            _ => self.average_char_width,
        };
        (em * 1000.0).round() as i64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

/// Inter Regular.
static INTER_TABLE: FontMetricTable = FontMetricTable {
    weight: Weight::Regular,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
        // [     \     ]     ^     _     `
        0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.59,
    ],
    average_char_width: 0.52,
    space_width: 0.25,
};

/// Inter Bold. Approximated from the regular advances, about 6% wider.
static INTER_BOLD_TABLE: FontMetricTable = FontMetricTable {
    weight: Weight::Bold,
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.25, 0.32, 0.41, 0.60, 0.60, 0.95, 0.72, 0.24, 0.35, 0.35, 0.42, 0.63, 0.30, 0.35, 0.30, 0.33,
        // 0     1     2     3     4     5     6     7     8     9
        0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60, 0.60,
        // :     ;     <     =     >     ?     @
        0.30, 0.30, 0.63, 0.63, 0.63, 0.54, 1.09,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.72, 0.65, 0.65, 0.72, 0.60, 0.54, 0.72, 0.72, 0.27, 0.42, 0.65, 0.57, 0.83,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.77, 0.60, 0.77, 0.65, 0.54, 0.60, 0.72, 0.72, 0.95, 0.65, 0.65, 0.60,
        // [     \     ]     ^     _     `
        0.30, 0.33, 0.30, 0.50, 0.60, 0.37,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.60, 0.60, 0.54, 0.60, 0.60, 0.33, 0.60, 0.60, 0.24, 0.24, 0.57, 0.24, 0.88,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.60, 0.60, 0.60, 0.60, 0.35, 0.47, 0.42, 0.60, 0.54, 0.77, 0.54, 0.54, 0.47,
        // {     |     }     ~
        0.35, 0.28, 0.35, 0.63,
    ],
    average_char_width: 0.55,
    space_width: 0.25,
};

/// Helvetica — AFM advance widths.
static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    weight: Weight::Regular,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.54,
    space_width: 0.278,
};

/// Helvetica-Bold — AFM advance widths.
static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    weight: Weight::Bold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0-9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    average_char_width: 0.58,
    space_width: 0.278,
};

/// Returns the static metric table for a family and weight.
pub fn get_metrics(family: FontFamily, weight: Weight) -> &'static FontMetricTable {
    match (family, weight) {
        (FontFamily::Inter, Weight::Regular) => &INTER_TABLE,
        (FontFamily::Inter, Weight::Bold) => &INTER_BOLD_TABLE,
        (FontFamily::Helvetica, Weight::Regular) => &HELVETICA_TABLE,
        (FontFamily::Helvetica, Weight::Bold) => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        let metrics = get_metrics(FontFamily::Inter, Weight::Regular);
        assert_eq!(metrics.measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let metrics = get_metrics(FontFamily::Inter, Weight::Regular);
        // "Rust" = R(0.61) + u(0.56) + s(0.44) + t(0.39) = 2.00
        let width = metrics.measure_str("Rust");
        assert!(
            (width - 2.00).abs() < 1e-3,
            "Rust width should be ~2.00, got {width}"
        );
    }

    #[test]
    fn test_helvetica_matches_afm() {
        let metrics = get_metrics(FontFamily::Helvetica, Weight::Regular);
        // H(722) + i(222) = 944
        assert!((metrics.measure_str("Hi") - 0.944).abs() < 1e-4);
        assert_eq!(metrics.pdf_width(b'W'), 944);
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let metrics = get_metrics(FontFamily::Helvetica, Weight::Regular);
        let width = metrics.measure_str("é");
        assert!((width - metrics.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_regular() {
        let text = "Senior Software Engineer";
        for family in [FontFamily::Helvetica, FontFamily::Inter] {
            let regular = get_metrics(family, Weight::Regular);
            let bold = get_metrics(family, Weight::Bold);
            assert_eq!(bold.weight, Weight::Bold, "{family:?}");
            assert!(bold.width_pt(text, 10.0) > regular.width_pt(text, 10.0), "{family:?}");
        }
    }

    #[test]
    fn test_width_pt_scales_with_size() {
        let metrics = get_metrics(FontFamily::Helvetica, Weight::Regular);
        let w10 = metrics.width_pt("Acme", 10.0);
        let w20 = metrics.width_pt("Acme", 20.0);
        assert!((w20 - 2.0 * w10).abs() < 1e-3);
    }
}
