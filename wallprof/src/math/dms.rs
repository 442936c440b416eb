use crate::WallprofError;

/// Parses a survey heading written as `D° M' S.sss"` into decimal
/// degrees.
///
/// Minutes and seconds are optional, and plain whitespace may stand
/// in for the unit marks, so `"12 30"` and `"12.5"` are both 12.5°. A
/// leading `-` negates the whole heading.
pub fn parse_dms(heading: &str) -> Result<f64, WallprofError> {
    let err = || WallprofError::Heading(heading.to_string());

    let trimmed = heading.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let cleaned: String = body
        .chars()
        .map(|c| match c {
            '°' | 'º' | '\'' | '′' | '"' | '″' => ' ',
            other => other,
        })
        .collect();

    let mut parts = [0.0; 3];
    let mut count = 0;
    for token in cleaned.split_whitespace() {
        let slot = parts.get_mut(count).ok_or_else(err)?;
        *slot = token.parse::<f64>().map_err(|_| err())?;
        count += 1;
    }

    let [deg, min, sec] = parts;
    if count == 0
        || !parts.iter().all(|v| v.is_finite() && *v >= 0.0)
        || min >= 60.0
        || sec >= 60.0
    {
        return Err(err());
    }

    let value = deg + min / 60.0 + sec / 3600.0;
    Ok(if negative { -value } else { value })
}
