use crate::error::ParseError;
use crate::model::Bank;
use crate::text::StatementText;

/// Фразы-маркеры, по которым выписка опознаётся как сбербанковская
const SBER_MARKERS: [&str; 3] = ["сбербанк", "sberbank", "сбер"];

/// Фразы-маркеры конкурирующего банка: их присутствие на первой странице
/// означает, что под видом Сбера загрузили чужую выписку
const TBANK_MARKERS: [&str; 4] = ["тбанк", "т-банк", "тинькофф", "tinkoff"];

/// Проверяет, что содержимое документа действительно принадлежит
/// заявленному банку.
///
/// Поиск — по подстрокам без учёта регистра и только по первой странице:
/// маркеры в футерах дальних страниц дают ложные срабатывания. Грамматика
/// Т-Банка содержательной проверки не требует (её строчные паттерны сами
/// достаточно специфичны), для Сбера проверка обязательна до парсинга.
pub fn verify_content(bank: Bank, text: &StatementText) -> Result<(), ParseError> {
    match bank {
        Bank::Tbank => Ok(()),
        Bank::Sber => verify_sber(text),
    }
}

fn verify_sber(text: &StatementText) -> Result<(), ParseError> {
    let first_page = text.first_page().to_lowercase();

    if TBANK_MARKERS.iter().any(|m| first_page.contains(m)) {
        return Err(ParseError::FormatMismatch {
            claimed: Bank::Sber.name().to_string(),
            detected: Some(Bank::Tbank.name().to_string()),
        });
    }

    if SBER_MARKERS.iter().any(|m| first_page.contains(m)) {
        Ok(())
    } else {
        Err(ParseError::FormatMismatch {
            claimed: Bank::Sber.name().to_string(),
            detected: None,
        })
    }
}
