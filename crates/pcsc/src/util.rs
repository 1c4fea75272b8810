/// Compare an ATR against a pattern, honouring an optional bit mask
pub(crate) fn match_atr(atr: &[u8], pattern: &[u8], mask: Option<&[u8]>) -> bool {
    if atr.len() != pattern.len() {
        return false;
    }

    match mask {
        Some(mask) => {
            if mask.len() != pattern.len() {
                return false;
            }
            atr.iter()
                .zip(pattern)
                .zip(mask)
                .all(|((a, p), m)| (a & m) == (p & m))
        }
        None => atr == pattern,
    }
}
