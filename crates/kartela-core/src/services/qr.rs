//! Text payload printed into swatch QR labels.
//!
//! One `KEY:value` pair per line, in this order:
//!
//! ```text
//! KARTELA:K-1042
//! RENK:19-4052
//! ADI:Classic Blue
//! DURUM:AKTIF
//! GOZ:2/6
//! MUSTERI:Deniz Tekstil
//! TARIH:17.10.2026
//! PANTONE:19-4052 TCX
//! ```
//!
//! `MUSTERI` and `PANTONE` are optional.

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::KartelaError;
use crate::models::swatch::{self, SwatchStatus};

const DATE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QrError {
    #[error("missing `{0}` line")]
    Missing(&'static str),
    #[error("malformed `{0}` line: {1}")]
    Malformed(&'static str, String),
}

impl From<QrError> for KartelaError {
    fn from(e: QrError) -> Self {
        KartelaError::BadRequest(format!("Invalid QR payload: {}", e))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    pub number: String,
    pub color_code: String,
    pub color_name: String,
    pub status: SwatchStatus,
    pub slots_used: i32,
    pub slots_max: i32,
    pub customer_name: Option<String>,
    pub date: NaiveDate,
    pub pantone_code: Option<String>,
}

/// Values must stay on one line.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ").trim().to_string()
}

impl QrPayload {
    pub fn from_swatch(s: &swatch::Model, customer_name: Option<String>, date: NaiveDate) -> Self {
        QrPayload {
            number: s.number.clone(),
            color_code: s.color_code.clone(),
            color_name: s.color_name.clone(),
            status: s.status,
            slots_used: s.slots_used,
            slots_max: s.slots_max,
            customer_name,
            date,
            pantone_code: s.pantone_code.clone(),
        }
    }

    pub fn encode(&self) -> String {
        let mut lines = vec![
            format!("KARTELA:{}", single_line(&self.number)),
            format!("RENK:{}", single_line(&self.color_code)),
            format!("ADI:{}", single_line(&self.color_name)),
            format!("DURUM:{}", self.status),
            format!("GOZ:{}/{}", self.slots_used, self.slots_max),
        ];
        if let Some(customer) = self.customer_name.as_deref().filter(|c| !c.trim().is_empty()) {
            lines.push(format!("MUSTERI:{}", single_line(customer)));
        }
        lines.push(format!("TARIH:{}", self.date.format(DATE_FORMAT)));
        if let Some(pantone) = self.pantone_code.as_deref().filter(|p| !p.trim().is_empty()) {
            lines.push(format!("PANTONE:{}", single_line(pantone)));
        }
        lines.join("\n")
    }

    /// Parse a scanned payload. Unknown keys are ignored; a missing `TARIH`
    /// falls back to `today`.
    pub fn parse(text: &str, today: NaiveDate) -> Result<Self, QrError> {
        let mut number = None;
        let mut color_code = None;
        let mut color_name = None;
        let mut status = None;
        let mut slots = None;
        let mut customer_name = None;
        let mut date = None;
        let mut pantone_code = None;

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_uppercase().as_str() {
                "KARTELA" => number = Some(value.to_string()),
                "RENK" => color_code = Some(value.to_string()),
                "ADI" => color_name = Some(value.to_string()),
                "DURUM" => {
                    status = Some(
                        value
                            .parse::<SwatchStatus>()
                            .map_err(|e| QrError::Malformed("DURUM", e.to_string()))?,
                    )
                }
                "GOZ" => slots = Some(parse_slots(value)?),
                "MUSTERI" if !value.is_empty() => customer_name = Some(value.to_string()),
                "TARIH" => {
                    date = Some(
                        NaiveDate::parse_from_str(value, DATE_FORMAT)
                            .map_err(|e| QrError::Malformed("TARIH", e.to_string()))?,
                    )
                }
                "PANTONE" if !value.is_empty() => pantone_code = Some(value.to_string()),
                _ => {}
            }
        }

        let number = number
            .filter(|n| !n.is_empty())
            .ok_or(QrError::Missing("KARTELA"))?;
        let (slots_used, slots_max) = slots.ok_or(QrError::Missing("GOZ"))?;

        Ok(QrPayload {
            number,
            color_code: color_code.ok_or(QrError::Missing("RENK"))?,
            color_name: color_name.ok_or(QrError::Missing("ADI"))?,
            status: status.ok_or(QrError::Missing("DURUM"))?,
            slots_used,
            slots_max,
            customer_name,
            date: date.unwrap_or(today),
            pantone_code,
        })
    }
}

fn parse_slots(value: &str) -> Result<(i32, i32), QrError> {
    let malformed = || QrError::Malformed("GOZ", value.to_string());
    let (used, max) = value.split_once('/').ok_or_else(malformed)?;
    let used: i32 = used.trim().parse().map_err(|_| malformed())?;
    let max: i32 = max.trim().parse().map_err(|_| malformed())?;
    if used < 0 || max < 1 || used > max {
        return Err(malformed());
    }
    Ok((used, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn sample() -> QrPayload {
        QrPayload {
            number: "K-1042".to_string(),
            color_code: "19-4052".to_string(),
            color_name: "Classic Blue".to_string(),
            status: SwatchStatus::Aktif,
            slots_used: 2,
            slots_max: 6,
            customer_name: None,
            date: day(),
            pantone_code: None,
        }
    }

    #[test]
    fn test_encode_without_optionals() {
        assert_eq!(
            sample().encode(),
            "KARTELA:K-1042\nRENK:19-4052\nADI:Classic Blue\nDURUM:AKTIF\nGOZ:2/6\nTARIH:17.10.2026"
        );
    }

    #[test]
    fn test_encode_places_optionals() {
        let mut p = sample();
        p.customer_name = Some("Deniz Tekstil".to_string());
        p.pantone_code = Some("19-4052 TCX".to_string());
        let lines: Vec<String> = p.encode().lines().map(str::to_string).collect();
        assert_eq!(lines[5], "MUSTERI:Deniz Tekstil");
        assert_eq!(lines[6], "TARIH:17.10.2026");
        assert_eq!(lines[7], "PANTONE:19-4052 TCX");
    }

    #[test]
    fn test_encode_flattens_newlines() {
        let mut p = sample();
        p.color_name = "Classic\nBlue".to_string();
        assert!(p.encode().contains("ADI:Classic Blue\n"));
    }

    #[test]
    fn test_parse_scanned_label() {
        let text = "KARTELA:K-77\r\nRENK:18-1663\nADI:Fiery Red\nDURUM:DOLU\nGOZ:4/4\nMUSTERI:Ege Örme\nTARIH:01.02.2026\nEXTRA:x";
        let p = QrPayload::parse(text, day()).unwrap();
        assert_eq!(p.number, "K-77");
        assert_eq!(p.status, SwatchStatus::Dolu);
        assert_eq!((p.slots_used, p.slots_max), (4, 4));
        assert_eq!(p.customer_name.as_deref(), Some("Ege Örme"));
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert!(p.pantone_code.is_none());
    }

    #[test]
    fn test_parse_requires_number() {
        let err = QrPayload::parse("RENK:1\nADI:a\nDURUM:AKTIF\nGOZ:0/1", day()).unwrap_err();
        assert_eq!(err, QrError::Missing("KARTELA"));
    }

    #[test]
    fn test_parse_rejects_bad_slots() {
        let err = QrPayload::parse("KARTELA:1\nRENK:1\nADI:a\nDURUM:AKTIF\nGOZ:5/2", day());
        assert!(matches!(err, Err(QrError::Malformed("GOZ", _))));
    }
}
