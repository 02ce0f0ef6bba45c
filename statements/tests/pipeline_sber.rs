use chrono::NaiveDate;
use statements::{parse_statement, Bank, Category, ParseError, StatementText};

const STATEMENT: &str = "\
ПАО Сбербанк
Выписка по счёту дебетовой карты
Итого по операциям с 01.04.2025 по 30.04.2025
01.04.2025 12:30 000123 Магазин Продукты -1 234,56
02.04.2025 09:00 000124 Пополнение через банкомат +5 000,00
03.04.2025 18:45 000125 Кофейня у дома 250,00
04.04.2025 10:00 000126 Перевод СБП Иванов И. -2 000,00
Остаток на конец периода: 10 000,00
";

#[test]
fn full_sber_statement_is_parsed_and_categorized() {
    let parsed = parse_statement(Bank::Sber, &StatementText::from_text(STATEMENT)).unwrap();

    assert_eq!(parsed.transactions.len(), 4);

    let store = &parsed.transactions[0];
    assert_eq!(store.amount, -1234.56);
    assert_eq!(store.description, "Магазин Продукты");
    assert_eq!(store.category, Category::Stores);

    let topup = &parsed.transactions[1];
    assert_eq!(topup.amount, 5000.0);
    assert!(topup.is_income());
    assert_eq!(topup.category, Category::TopUp);

    // сумма без знака нормализуется в расход
    let coffee = &parsed.transactions[2];
    assert_eq!(coffee.amount, -250.0);
    assert_eq!(coffee.category, Category::Coffee);

    let transfer = &parsed.transactions[3];
    assert_eq!(transfer.category, Category::Transfers);

    assert_eq!(parsed.period_start, NaiveDate::from_ymd_opt(2025, 4, 1));
    assert_eq!(parsed.period_end, NaiveDate::from_ymd_opt(2025, 4, 30));
}

#[test]
fn tbank_document_claimed_as_sber_is_rejected() {
    let text = StatementText::from_text(
        "АО «ТБанк»\n\
         Справка о движении средств\n\
         01.04.2025 12:30 000123 Магазин Продукты -1 234,56",
    );

    match parse_statement(Bank::Sber, &text) {
        Err(ParseError::FormatMismatch { claimed, detected }) => {
            assert_eq!(claimed, "Сбербанк");
            assert_eq!(detected.as_deref(), Some("Т-Банк"));
        }
        other => panic!("ожидали FormatMismatch, получили {other:?}"),
    }
}

#[test]
fn unsigned_document_without_sber_signature_is_rejected() {
    let text = StatementText::from_text("01.04.2025 12:30 000123 Магазин Продукты -1 234,56");

    match parse_statement(Bank::Sber, &text) {
        Err(ParseError::FormatMismatch { detected, .. }) => assert_eq!(detected, None),
        other => panic!("ожидали FormatMismatch, получили {other:?}"),
    }
}

#[test]
fn signature_on_a_later_page_does_not_pass_verification() {
    let text = StatementText::from_pages(vec![
        "01.04.2025 12:30 000123 Магазин Продукты -1 234,56".to_string(),
        "ПАО Сбербанк".to_string(),
    ]);

    assert!(matches!(
        parse_statement(Bank::Sber, &text),
        Err(ParseError::FormatMismatch { .. })
    ));
}
