use chrono::{NaiveDate, NaiveTime};

use crate::error::ParseError;

/// Разбирает денежную сумму из текста выписки.
///
/// Понимает запятую как десятичный разделитель, обычные/неразрывные/узкие
/// пробелы как разделители тысяч и явный знак `+`/`-`. Сумма без знака
/// считается положительной — знаковую политику задаёт грамматика банка.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, ParseError> {
    let mut cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    if cleaned.contains(',') {
        if cleaned.contains('.') {
            // "1,234.56" — запятые тысячные
            cleaned = cleaned.replace(',', "");
        } else {
            cleaned = cleaned.replace(',', ".");
        }
    }

    if cleaned.is_empty() {
        return Err(ParseError::InvalidAmount("empty amount".into()));
    }

    let unsigned = cleaned.trim_start_matches(['+', '-']);
    if unsigned.split('.').count() > 2 {
        // больше одной точки — странный формат
        return Err(ParseError::InvalidAmount(format!(
            "too many dots in amount: {cleaned}"
        )));
    }

    cleaned
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidAmount(raw.trim().to_string()))
}

/// Дата в формате выписки: `DD.MM.YYYY`
pub(crate) fn parse_date_dmy(raw: &str) -> Result<NaiveDate, ParseError> {
    Ok(NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")?)
}

/// Время операции: `HH:MM`
pub(crate) fn parse_time_hm(raw: &str) -> Result<NaiveTime, ParseError> {
    Ok(NaiveTime::parse_from_str(raw.trim(), "%H:%M")?)
}

/// Дата сохранённой операции, как её записало хранилище.
///
/// Запись с нечитаемой датой из агрегации выпадает молча (с диагностикой
/// в stderr), не прерывая расчёт по остальным записям.
pub(crate) fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y") {
        Ok(d) => Some(d),
        Err(e) => {
            eprintln!("dropping stored transaction with unparsable date '{raw}': {e}");
            None
        }
    }
}

pub(crate) fn first_day_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("month must be in 1..=12")
}

pub(crate) fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_first = if month == 12 {
        first_day_of_month(year + 1, 1)
    } else {
        first_day_of_month(year, month + 1)
    };
    next_first.pred_opt().expect("date has a predecessor")
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
