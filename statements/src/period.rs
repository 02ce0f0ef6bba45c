use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::parse_date_dmy;

/// Метки заявленного периода выписки: вариант Т-Банка и вариант Сбера
static PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:Движение средств за период с|Итого по операциям с)\s+(\d{2}\.\d{2}\.\d{4})\s+по\s+(\d{2}\.\d{2}\.\d{4})",
    )
    .unwrap()
});

/// Достаёт заявленный период выписки из полного текста.
///
/// Отсутствие меток или нечитаемые даты — не ошибка: конвейер продолжает
/// работу и возвращает хотя бы построчные операции без периода.
pub fn extract_period(full_text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let Some(caps) = PERIOD_RE.captures(full_text) else {
        return (None, None);
    };

    let start = parse_date_dmy(&caps[1]).ok();
    let end = parse_date_dmy(&caps[2]).ok();
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tbank_period_label() {
        let text = "Справка\nДвижение средств за период с 01.03.2025 по 31.03.2025\n...";
        let (start, end) = extract_period(text);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 3, 31));
    }

    #[test]
    fn extracts_sber_period_label() {
        let text = "Итого по операциям с 01.04.2025 по 30.04.2025";
        let (start, end) = extract_period(text);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 30));
    }

    #[test]
    fn missing_label_is_not_an_error() {
        assert_eq!(extract_period("выписка без меток периода"), (None, None));
    }

    #[test]
    fn unparsable_dates_become_none() {
        let text = "Движение средств за период с 31.13.2025 по 31.03.2025";
        let (start, end) = extract_period(text);
        assert_eq!(start, None);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 3, 31));
    }
}
