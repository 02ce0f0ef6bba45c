pub mod analytics;
pub mod bank;
pub mod categorize;
pub mod error;
pub mod model;
pub mod period;
pub mod portrait;
pub mod sber;
pub mod tbank;
pub mod text;

mod utils;

pub use crate::analytics::{
    Advice, CategoryStats, ClockPicker, FixedPicker, IncomeRow, MonthlyRow, PhrasePicker,
};
pub use crate::error::ParseError;
pub use crate::model::{
    Bank, Category, CategorizedTransaction, ParsedStatement, RawTransaction, StatementSummary,
    StoredTransaction,
};
pub use crate::portrait::{DayCluster, MonthPortrait};
pub use crate::text::StatementText;

/// Полный конвейер разбора одной выписки.
///
/// Проверяет соответствие текста заявленному банку, выбирает грамматику,
/// категоризирует каждую операцию и вытаскивает заявленный период.
/// Пустой документ — пустой результат без периода, не ошибка.
pub fn parse_statement(
    bank: Bank,
    text: &StatementText,
) -> Result<ParsedStatement, ParseError> {
    bank::verify_content(bank, text)?;

    let raw = match bank {
        Bank::Tbank => tbank::parse(text),
        Bank::Sber => sber::parse(text),
    };

    let transactions = raw
        .into_iter()
        .map(|tx| {
            let category = categorize::categorize(bank, &tx.description);
            CategorizedTransaction::new(tx, category)
        })
        .collect();

    let (period_start, period_end) = period::extract_period(&text.full_text());

    Ok(ParsedStatement {
        period_start,
        period_end,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_empty_statement() {
        let parsed = parse_statement(Bank::Tbank, &StatementText::default()).unwrap();

        assert!(parsed.transactions.is_empty());
        assert_eq!(parsed.period_start, None);
        assert_eq!(parsed.period_end, None);
    }

    #[test]
    fn sber_verification_happens_before_parsing() {
        let text = StatementText::from_text(
            "01.04.2025 12:30 000123 Магазин Продукты -1 234,56",
        );

        // без подписи Сбера на первой странице документ отклоняется,
        // даже если строки совпадают с паттерном операций
        assert!(matches!(
            parse_statement(Bank::Sber, &text),
            Err(ParseError::FormatMismatch { .. })
        ));
    }
}
