//! Bidi_Mirroring_Glyph data
//!
//! Pairs are listed once, lower code point first, sorted on that code point.

const MIRROR_PAIRS: &[(u16, u16)] = &[
    (0x0028, 0x0029),
    (0x003c, 0x003e),
    (0x005b, 0x005d),
    (0x007b, 0x007d),
    (0x00ab, 0x00bb),
    (0x0f3a, 0x0f3b),
    (0x0f3c, 0x0f3d),
    (0x169b, 0x169c),
    (0x2039, 0x203a),
    (0x2045, 0x2046),
    (0x207d, 0x207e),
    (0x208d, 0x208e),
    (0x2208, 0x220b),
    (0x2209, 0x220c),
    (0x220a, 0x220d),
    (0x2215, 0x29f5),
    (0x223c, 0x223d),
    (0x2243, 0x22cd),
    (0x2252, 0x2253),
    (0x2254, 0x2255),
    (0x2264, 0x2265),
    (0x2266, 0x2267),
    (0x2268, 0x2269),
    (0x226a, 0x226b),
    (0x226e, 0x226f),
    (0x2270, 0x2271),
    (0x2272, 0x2273),
    (0x2274, 0x2275),
    (0x2276, 0x2277),
    (0x2278, 0x2279),
    (0x227a, 0x227b),
    (0x227c, 0x227d),
    (0x227e, 0x227f),
    (0x2280, 0x2281),
    (0x2282, 0x2283),
    (0x2284, 0x2285),
    (0x2286, 0x2287),
    (0x2288, 0x2289),
    (0x228a, 0x228b),
    (0x228f, 0x2290),
    (0x2291, 0x2292),
    (0x2298, 0x29b8),
    (0x22a2, 0x22a3),
    (0x22a6, 0x2ade),
    (0x22a8, 0x2ae4),
    (0x22a9, 0x2ae3),
    (0x22ab, 0x2ae5),
    (0x22b0, 0x22b1),
    (0x22b2, 0x22b3),
    (0x22b4, 0x22b5),
    (0x22b6, 0x22b7),
    (0x22c9, 0x22ca),
    (0x22cb, 0x22cc),
    (0x22d0, 0x22d1),
    (0x22d6, 0x22d7),
    (0x22d8, 0x22d9),
    (0x22da, 0x22db),
    (0x22dc, 0x22dd),
    (0x22de, 0x22df),
    (0x22e0, 0x22e1),
    (0x22e2, 0x22e3),
    (0x22e4, 0x22e5),
    (0x22e6, 0x22e7),
    (0x22e8, 0x22e9),
    (0x22ea, 0x22eb),
    (0x22ec, 0x22ed),
    (0x22f0, 0x22f1),
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
    (0x27c3, 0x27c4),
    (0x27c5, 0x27c6),
    (0x27c8, 0x27c9),
    (0x27d5, 0x27d6),
    (0x27dd, 0x27de),
    (0x27e2, 0x27e3),
    (0x27e4, 0x27e5),
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
    (0x298e, 0x298f),
    (0x2991, 0x2992),
    (0x2993, 0x2994),
    (0x2995, 0x2996),
    (0x2997, 0x2998),
    (0x29c0, 0x29c1),
    (0x29c4, 0x29c5),
    (0x29cf, 0x29d0),
    (0x29d1, 0x29d2),
    (0x29d4, 0x29d5),
    (0x29d8, 0x29d9),
    (0x29da, 0x29db),
    (0x29fc, 0x29fd),
    (0x2e02, 0x2e03),
    (0x2e04, 0x2e05),
    (0x2e09, 0x2e0a),
    (0x2e0c, 0x2e0d),
    (0x2e1c, 0x2e1d),
    (0x2e20, 0x2e21),
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
    (0xfe64, 0xfe65),
    (0xff08, 0xff09),
    (0xff1c, 0xff1e),
    (0xff3b, 0xff3d),
    (0xff5b, 0xff5d),
    (0xff5f, 0xff60),
    (0xff62, 0xff63),
];

/// Mirror image of `c`, if it has one.
pub fn mirror(c: u32) -> Option<u32> {
    let unit = u16::try_from(c).ok()?;
    if let Ok(idx) = MIRROR_PAIRS.binary_search_by_key(&unit, |&(low, _)| low) {
        return Some(MIRROR_PAIRS[idx].1 as u32);
    }
    MIRROR_PAIRS
        .iter()
        .find(|&&(_, high)| high == unit)
        .map(|&(low, _)| low as u32)
}
