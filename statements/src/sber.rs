use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::RawTransaction;
use crate::text::StatementText;
use crate::utils::{parse_amount, parse_date_dmy, parse_time_hm};

/// Одна операция — одна строка: дата, время, номер документа, описание,
/// сумма с запятой-разделителем и, возможно, неразрывными пробелами тысяч
static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{2}\.\d{2}\.\d{4})\s+(\d{2}:\d{2})\s+(\d+)\s+(.+?)\s+([+\-]?\d[\d\s]*(?:[.,]\d{1,2})?)$",
    )
    .unwrap()
});

/// Разбирает однострочную выписку Сбера.
///
/// Строки, не совпавшие с паттерном операции, операциями не являются и
/// молча пропускаются. Знаковая нормализация: явный `+` — доход, явный `-`
/// или отсутствие знака — расход (сумма становится отрицательной).
pub fn parse(text: &StatementText) -> Vec<RawTransaction> {
    let mut txs = Vec::new();

    for line in text.lines() {
        let Some(caps) = LINE_RE.captures(line) else {
            continue;
        };

        let date = match parse_date_dmy(&caps[1]) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("skipping line with unparsable date '{}': {e}", &caps[1]);
                continue;
            }
        };

        let raw_amount = caps[5].trim();
        let value = match parse_amount(raw_amount) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("skipping line with unparsable amount '{raw_amount}': {e}");
                continue;
            }
        };
        let amount = if raw_amount.starts_with('+') || raw_amount.starts_with('-') {
            value
        } else {
            -value
        };

        txs.push(RawTransaction {
            date,
            time: parse_time_hm(&caps[2]).ok(),
            amount,
            description: caps[4].trim().to_string(),
        });
    }

    txs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn parse_lines(input: &str) -> Vec<RawTransaction> {
        parse(&StatementText::from_text(input))
    }

    #[test]
    fn parses_single_line_record() {
        let txs = parse_lines("01.04.2025 12:30 000123 Магазин Продукты -1 234,56");

        assert_eq!(txs.len(), 1);
        let tx = &txs[0];
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(tx.time, NaiveTime::from_hms_opt(12, 30, 0));
        assert_eq!(tx.amount, -1234.56);
        assert_eq!(tx.description, "Магазин Продукты");
    }

    #[test]
    fn explicit_plus_is_income() {
        let txs = parse_lines("02.04.2025 09:00 000124 Пополнение через банкомат +5 000,00");

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, 5000.0);
        assert!(txs[0].is_income());
    }

    #[test]
    fn unsigned_amount_is_normalized_to_expense() {
        let txs = parse_lines("03.04.2025 18:45 000125 Кофейня у дома 250,00");

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, -250.0);
        assert!(!txs[0].is_income());
    }

    #[test]
    fn nbsp_thousands_separator_is_accepted() {
        let txs = parse_lines("04.04.2025 10:00 000126 Перевод СБП -12\u{a0}500,00");

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, -12500.0);
    }

    #[test]
    fn non_matching_lines_are_ignored() {
        let txs = parse_lines(
            "ПАО Сбербанк\n\
             Выписка по счёту дебетовой карты\n\
             01.04.2025 12:30 000123 Магазин Продукты -1 234,56\n\
             Остаток на конец периода: 10 000,00",
        );

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Магазин Продукты");
    }

    #[test]
    fn line_with_invalid_date_is_skipped() {
        let txs = parse_lines(
            "31.13.2025 12:30 000123 Плохая дата -100,00\n\
             01.04.2025 12:30 000124 Хорошая запись -200,00",
        );

        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "Хорошая запись");
    }

    #[test]
    fn empty_document_yields_no_transactions() {
        assert!(parse_lines("").is_empty());
    }
}
