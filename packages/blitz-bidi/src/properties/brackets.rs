//! Bidi_Paired_Bracket data
//!
//! Every entry pairs an opening bracket with its closing counterpart, sorted
//! by the opening code point so lookups can binary search.

/// Whether a paired bracket opens or closes its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BracketKind {
    Open,
    Close,
}

/// Bidi_Paired_Bracket and Bidi_Paired_Bracket_Type of one code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairedBracket {
    /// The other half of the pair.
    pub pair: u32,
    pub kind: BracketKind,
}

const BRACKET_PAIRS: &[(u16, u16)] = &[
    (0x0028, 0x0029),
    (0x005b, 0x005d),
    (0x007b, 0x007d),
    (0x0f3a, 0x0f3b),
    (0x0f3c, 0x0f3d),
    (0x169b, 0x169c),
    (0x2045, 0x2046),
    (0x207d, 0x207e),
    (0x208d, 0x208e),
    (0x2308, 0x2309),
    (0x230a, 0x230b),
    (0x2329, 0x232a),
    (0x2768, 0x2769),
    (0x276a, 0x276b),
    (0x276c, 0x276d),
    (0x276e, 0x276f),
    (0x2770, 0x2771),
    (0x2772, 0x2773),
    (0x2774, 0x2775),
    (0x27c5, 0x27c6),
    (0x27e6, 0x27e7),
    (0x27e8, 0x27e9),
    (0x27ea, 0x27eb),
    (0x27ec, 0x27ed),
    (0x27ee, 0x27ef),
    (0x2983, 0x2984),
    (0x2985, 0x2986),
    (0x2987, 0x2988),
    (0x2989, 0x298a),
    (0x298b, 0x298c),
    (0x298d, 0x2990),
    (0x298f, 0x298e),
    (0x2991, 0x2992),
    (0x2993, 0x2994),
    (0x2995, 0x2996),
    (0x2997, 0x2998),
    (0x29d8, 0x29d9),
    (0x29da, 0x29db),
    (0x29fc, 0x29fd),
    (0x2e22, 0x2e23),
    (0x2e24, 0x2e25),
    (0x2e26, 0x2e27),
    (0x2e28, 0x2e29),
    (0x2e55, 0x2e56),
    (0x2e57, 0x2e58),
    (0x2e59, 0x2e5a),
    (0x2e5b, 0x2e5c),
    (0x3008, 0x3009),
    (0x300a, 0x300b),
    (0x300c, 0x300d),
    (0x300e, 0x300f),
    (0x3010, 0x3011),
    (0x3014, 0x3015),
    (0x3016, 0x3017),
    (0x3018, 0x3019),
    (0x301a, 0x301b),
    (0xfe59, 0xfe5a),
    (0xfe5b, 0xfe5c),
    (0xfe5d, 0xfe5e),
    (0xff08, 0xff09),
    (0xff3b, 0xff3d),
    (0xff5b, 0xff5d),
    (0xff5f, 0xff60),
    (0xff62, 0xff63),
];

/// Look up the paired bracket of `c`.
pub fn paired_bracket(c: u32) -> Option<PairedBracket> {
    let unit = u16::try_from(c).ok()?;
    if let Ok(idx) = BRACKET_PAIRS.binary_search_by_key(&unit, |&(open, _)| open) {
        return Some(PairedBracket {
            pair: BRACKET_PAIRS[idx].1 as u32,
            kind: BracketKind::Open,
        });
    }
    BRACKET_PAIRS
        .iter()
        .find(|&&(_, close)| close == unit)
        .map(|&(open, _)| PairedBracket {
            pair: open as u32,
            kind: BracketKind::Close,
        })
}
