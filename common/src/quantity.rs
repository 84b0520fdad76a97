/// Parses a JSON-RPC hex quantity such as `"0x1b4"`.
pub fn parse_quantity(s: &str) -> Option<u64> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

pub fn format_quantity(n: u64) -> String {
    format!("{n:#x}")
}
