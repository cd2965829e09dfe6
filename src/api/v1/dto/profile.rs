/*
 * Responsibility
 * - Profile 更新の入力 DTO (multipart を boundary で 1 回だけ decode する)
 * - 日付リストの validation (全要素 OK か、リクエストごと reject か)
 */
use axum::extract::Multipart;

use crate::error::AppError;

/// An inbound photo, held only until the storage bridge returns a URL.
pub struct UploadedPhoto {
    pub buffer: Vec<u8>,
    pub original_name: String,
}

/// A date string already validated against `YYYY-MM-DD`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateToken(String);

impl DateToken {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        if is_iso_date(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(AppError::invalid_input(format!("invalid date '{raw}'")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && [0, 1, 2, 3, 5, 6, 8, 9].iter().all(|&i| b[i].is_ascii_digit())
}

/// Collapse repeated fields and/or comma-delimited values into an ordered
/// token list. All-or-nothing: the first offending value rejects the whole
/// request, before any network call is made.
pub fn collect_date_tokens(raw_fields: &[String]) -> Result<Vec<DateToken>, AppError> {
    let mut tokens = Vec::new();
    for field in raw_fields {
        for piece in field.split(',') {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            tokens.push(DateToken::parse(piece)?);
        }
    }
    Ok(tokens)
}

/// Profile update, decoded once from the inbound multipart body.
pub struct ProfileUpdateInput {
    pub photo: Option<UploadedPhoto>,
    pub photo_url: Option<String>,
    pub remove_photo: Option<bool>,
    pub available_dates: Vec<DateToken>,
}

impl ProfileUpdateInput {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut photo = None;
        let mut photo_url = None;
        let mut remove_photo = None;
        let mut raw_dates: Vec<String> = Vec::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("malformed multipart body: {e}")))?
        {
            // Own the name first: reading the field consumes it.
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "foto" => {
                    let original_name = field
                        .file_name()
                        .unwrap_or("foto")
                        .to_string();
                    let buffer = field
                        .bytes()
                        .await
                        .map_err(|e| {
                            AppError::invalid_input(format!("malformed multipart body: {e}"))
                        })?
                        .to_vec();
                    photo = Some(UploadedPhoto {
                        buffer,
                        original_name,
                    });
                }
                "urlFoto" => {
                    let value = read_text(field).await?;
                    if !value.is_empty() {
                        photo_url = Some(value);
                    }
                }
                "quitarFoto" => {
                    remove_photo = Some(parse_flag(&read_text(field).await?)?);
                }
                "fechasDisponibles" => {
                    raw_dates.push(read_text(field).await?);
                }
                // Unknown fields are dropped, never forwarded.
                _ => {}
            }
        }

        let available_dates = collect_date_tokens(&raw_dates)?;

        Ok(Self {
            photo,
            photo_url,
            remove_photo,
            available_dates,
        })
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map(|s| s.trim().to_string())
        .map_err(|e| AppError::invalid_input(format!("malformed multipart body: {e}")))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::invalid_input(format!(
            "invalid flag '{other}' (expected true/false)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_well_formed_dates() {
        let tokens = collect_date_tokens(&strings(&["2025-01-01", "2025-02-01"])).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].as_str(), "2025-01-01");
    }

    #[test]
    fn one_bad_date_rejects_the_whole_list() {
        let err = collect_date_tokens(&strings(&["2025-01-01", "01/02/2025"])).unwrap_err();
        assert!(err.to_string().contains("01/02/2025"));
    }

    #[test]
    fn comma_delimited_values_are_expanded_in_order() {
        let tokens = collect_date_tokens(&strings(&["2025-01-01,2025-02-01", "2025-03-01"])).unwrap();
        let dates: Vec<&str> = tokens.iter().map(DateToken::as_str).collect();
        assert_eq!(dates, ["2025-01-01", "2025-02-01", "2025-03-01"]);
    }

    #[test]
    fn empty_pieces_are_skipped() {
        let tokens = collect_date_tokens(&strings(&["", " 2025-01-01 , "])).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn rejects_near_misses() {
        for bad in ["2025-1-1", "20250101", "abcd-ef-gh", "2025-01-015"] {
            assert!(DateToken::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn parses_removal_flag() {
        assert_eq!(parse_flag("true").unwrap(), true);
        assert_eq!(parse_flag("0").unwrap(), false);
        assert!(parse_flag("yes").is_err());
    }
}
