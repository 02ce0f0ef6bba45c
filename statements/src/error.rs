use std::{error::Error, fmt};
use chrono::ParseError as ChronoParseError;

/// Ошибки при разборе банковской выписки
#[derive(Debug)]
pub enum ParseError {
    // обёртки

    /// обёртка chrono::ParseError
    Date(ChronoParseError),

    // логические ошибки

    /// идентификатор банка не из поддерживаемого набора
    UnsupportedBank(String),
    /// содержимое выписки не соответствует заявленному банку
    ///
    /// `detected` заполняется, если в тексте опознан конкурирующий банк
    FormatMismatch {
        claimed: String,
        detected: Option<String>,
    },
    /// ошибка при парсинге денежной суммы
    InvalidAmount(String),
    /// неизвестная метка категории
    InvalidCategory(String),
    /// очень общая ошибка плохих входных данных
    BadInput(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Date(e) => write!(f, "date parse error: {e}"),
            ParseError::UnsupportedBank(token) => write!(f, "unsupported bank: {token}"),
            ParseError::FormatMismatch { claimed, detected } => match detected {
                Some(bank) => write!(
                    f,
                    "statement content does not match bank '{claimed}': looks like a '{bank}' statement"
                ),
                None => write!(
                    f,
                    "statement content does not match bank '{claimed}': no bank signature found"
                ),
            },
            ParseError::InvalidAmount(s) => write!(f, "invalid amount: {s}"),
            ParseError::InvalidCategory(s) => write!(f, "invalid category: {s}"),
            ParseError::BadInput(msg) => write!(f, "bad input: {msg}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Date(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ChronoParseError> for ParseError {
    fn from(e: ChronoParseError) -> Self {
        ParseError::Date(e)
    }
}
