//! Custom metrics fragment shaping.

/// Keep non-blank, non-comment lines, trimmed and newline-terminated, in
/// their original order.
pub fn clean_lines(rendered: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(rendered.len());
    for line in rendered.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    out
}

/// `<name> <value>` line, empty when there is no name.
pub fn literal_line(name: &str, value: f64) -> Vec<u8> {
    if name.is_empty() {
        return Vec::new();
    }
    format!("{} {}\n", name, format_value(value)).into_bytes()
}

/// Shortest round-trip digits, in exponent form when the decimal exponent
/// is below -4 or at least 6 (`1e+06`, `2.5e-07`). Non-finite values use the
/// exposition format spellings `+Inf`, `-Inf` and `NaN`.
fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let scientific = format!("{:e}", value);
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exp.parse::<i32>() else {
        return value.to_string();
    };
    if (-4..6).contains(&exponent) {
        return value.to_string();
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_lines_strips_blanks_and_comments() {
        let rendered = "\n# HELP build_info Build metadata\n  build_info{v=\"1\"} 1  \n\n\t# TYPE x gauge\nx 2\n   \n";
        assert_eq!(clean_lines(rendered), b"build_info{v=\"1\"} 1\nx 2\n");
    }

    #[test]
    fn test_clean_lines_preserves_order_and_terminates_last_line() {
        assert_eq!(clean_lines("c 3\r\nb 2\na 1"), b"c 3\nb 2\na 1\n");
    }

    #[test]
    fn test_clean_lines_of_only_comments_is_empty() {
        assert!(clean_lines("# one\n\n   # two\n").is_empty());
    }

    #[test]
    fn test_literal_line_formatting() {
        assert_eq!(literal_line("deploy_marker", 1.0), b"deploy_marker 1\n");
        assert_eq!(literal_line("ratio", 0.25), b"ratio 0.25\n");
        assert_eq!(literal_line("neg", -3.5), b"neg -3.5\n");
    }

    #[test]
    fn test_literal_line_large_and_small_values_use_exponent() {
        assert_eq!(literal_line("big", 1e21), b"big 1e+21\n");
        assert_eq!(literal_line("big", 1e6), b"big 1e+06\n");
        assert_eq!(literal_line("big", 123456789.0), b"big 1.23456789e+08\n");
        assert_eq!(literal_line("below", 100000.0), b"below 100000\n");
        assert_eq!(literal_line("tiny", 0.00001), b"tiny 1e-05\n");
        assert_eq!(literal_line("tiny", -2.5e-7), b"tiny -2.5e-07\n");
        assert_eq!(literal_line("edge", 0.0001), b"edge 0.0001\n");
        assert_eq!(literal_line("huge", 1e100), b"huge 1e+100\n");
    }

    #[test]
    fn test_literal_line_non_finite_values() {
        assert_eq!(literal_line("up", f64::INFINITY), b"up +Inf\n");
        assert_eq!(literal_line("down", f64::NEG_INFINITY), b"down -Inf\n");
        assert_eq!(literal_line("unknown", f64::NAN), b"unknown NaN\n");
    }

    #[test]
    fn test_literal_line_without_name_is_empty() {
        assert!(literal_line("", 42.0).is_empty());
    }
}
