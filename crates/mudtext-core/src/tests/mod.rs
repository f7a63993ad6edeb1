mod renderer;

/// Concatenates random pieces of markup, text and HTML-special characters.
///
/// Deterministic (fixed-seed xorshift) so failures reproduce.
pub(crate) fn sample_inputs(count: usize) -> Vec<String> {
    const PIECES: [&str; 30] = [
        "{r", "{G", "{[b", "{[X", "{h", "{H", "{n", "{/", "{-", "{_", "{{", "{lc", "{lt", "{le",
        "{", "{z", "{[", "{l", "a", "Hello", "剑", "ｶ", " ", "  ", "<", "&", "\"", "'", "\n",
        "$NAME",
    ];
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    (0..count)
        .map(|_| {
            let len = (next() % 12) as usize;
            (0..len)
                .map(|_| PIECES[(next() % PIECES.len() as u64) as usize])
                .collect()
        })
        .collect()
}
