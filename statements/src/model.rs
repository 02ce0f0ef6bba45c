use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;

/// Поддерживаемые банки
///
/// Каждый банк несёт свою грамматику выписки и свою таблицу правил
/// категоризации. Диспетчеризация по закрытому enum, а не по строкам.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bank {
    /// Т-Банк (бывш. Тинькофф), карточная выписка из двух строк на операцию
    #[serde(rename = "tbank")]
    Tbank,
    /// Сбербанк, однострочная выписка по операциям
    #[serde(rename = "sber")]
    Sber,
}

impl Bank {
    /// Разбирает строковый идентификатор банка, переданный вызывающей стороной.
    ///
    /// Неизвестный токен отклоняется до любой попытки парсинга.
    pub fn from_token(token: &str) -> Result<Self, ParseError> {
        match token.trim().to_lowercase().as_str() {
            "tbank" | "tinkoff" => Ok(Bank::Tbank),
            "sber" => Ok(Bank::Sber),
            other => Err(ParseError::UnsupportedBank(other.to_string())),
        }
    }

    /// Человекочитаемое имя банка (для сообщений об ошибках)
    pub fn name(&self) -> &'static str {
        match self {
            Bank::Tbank => "Т-Банк",
            Bank::Sber => "Сбербанк",
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bank::Tbank => write!(f, "tbank"),
            Bank::Sber => write!(f, "sber"),
        }
    }
}

/// Закрытый набор категорий трат
///
/// Внешние метки — русские, как их отдаёт API. Порядок объявления совпадает
/// с порядком таблиц правил: при совпадении нескольких правил побеждает
/// более ранняя категория.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    #[serde(rename = "Кофейни")]
    Coffee,
    #[serde(rename = "Магазины")]
    Stores,
    #[serde(rename = "Транспорт")]
    Transport,
    #[serde(rename = "Доставка")]
    Delivery,
    #[serde(rename = "Развлечения")]
    Entertainment,
    #[serde(rename = "Пополнение")]
    TopUp,
    #[serde(rename = "ЖКХ")]
    Utilities,
    #[serde(rename = "Переводы")]
    Transfers,
    #[serde(rename = "Другие")]
    Other,
}

impl Category {
    /// Все категории в порядке объявления
    pub const ALL: [Category; 9] = [
        Category::Coffee,
        Category::Stores,
        Category::Transport,
        Category::Delivery,
        Category::Entertainment,
        Category::TopUp,
        Category::Utilities,
        Category::Transfers,
        Category::Other,
    ];

    /// Внешняя (русская) метка категории
    pub fn label(&self) -> &'static str {
        match self {
            Category::Coffee => "Кофейни",
            Category::Stores => "Магазины",
            Category::Transport => "Транспорт",
            Category::Delivery => "Доставка",
            Category::Entertainment => "Развлечения",
            Category::TopUp => "Пополнение",
            Category::Utilities => "ЖКХ",
            Category::Transfers => "Переводы",
            Category::Other => "Другие",
        }
    }

    /// Разбирает внешнюю метку (интерфейс исправления категории)
    pub fn from_label(label: &str) -> Result<Self, ParseError> {
        let trimmed = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == trimmed)
            .ok_or_else(|| ParseError::InvalidCategory(trimmed.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Сумма после ручного исправления категории.
///
/// Перенос в «Пополнение» делает сумму доходом (положительной), перенос из
/// «Пополнения» в любую расходную категорию — расходом (отрицательной).
/// Прочие исправления знак не трогают; сохранение записи — забота
/// вызывающей стороны.
pub fn corrected_amount(amount: f64, old: Category, new: Category) -> f64 {
    if new == Category::TopUp {
        amount.abs()
    } else if old == Category::TopUp {
        -amount.abs()
    } else {
        amount
    }
}

/// Одна операция, восстановленная из текста выписки (до категоризации)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTransaction {
    /// дата операции
    pub date: NaiveDate,
    /// время операции, если грамматика его содержит
    pub time: Option<NaiveTime>,
    /// сумма со знаком: расход < 0, доход > 0
    pub amount: f64,
    /// описание, возможно собранное из нескольких строк
    pub description: String,
}

impl RawTransaction {
    /// Доход — это положительная сумма (после нормализации знака)
    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// Операция с назначенной категорией — итог конвейера загрузки
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedTransaction {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub amount: f64,
    pub description: String,
    pub category: Category,
}

impl CategorizedTransaction {
    pub fn new(tx: RawTransaction, category: Category) -> Self {
        CategorizedTransaction {
            date: tx.date,
            time: tx.time,
            amount: tx.amount,
            description: tx.description,
            category,
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }
}

/// Результат разбора одной выписки.
///
/// Период может отсутствовать ([`None`]/[`None`]), если в тексте не нашлось
/// меток периода — это не ошибка. Пустой список операций — тоже корректный
/// результат, а не ошибка.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedStatement {
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub transactions: Vec<CategorizedTransaction>,
}

/// Сохранённая операция — контракт с внешним хранилищем.
///
/// Агрегация читает операции пользователя именно в этом виде. Дата хранится
/// строкой `DD.MM.YYYY`, как её записал конвейер загрузки; запись с
/// нечитаемой датой агрегация молча пропускает.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: String,
    pub time: Option<String>,
    pub amount: f64,
    pub description: String,
    pub category: Category,
    pub bank: Bank,
    /// ссылка на выписку; `None` у записей, загруженных до учёта выписок
    pub statement_id: Option<i64>,
}

/// Сохранённая выписка — группирующая сущность хранилища
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub id: i64,
    pub bank: Bank,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub uploaded_at: NaiveDateTime,
}

impl StatementSummary {
    /// Естественный ключ дубликата: тот же банк и тот же период
    pub fn covers(&self, bank: Bank, date_start: NaiveDate, date_end: NaiveDate) -> bool {
        self.bank == bank && self.date_start == date_start && self.date_end == date_end
    }
}

/// Ищет среди выписок пользователя уже загруженную с тем же периодом.
///
/// Проверка best-effort (check-then-insert): строгую однократность загрузки
/// должна обеспечивать вызывающая сторона своей сериализацией.
pub fn find_duplicate<'a>(
    existing: &'a [StatementSummary],
    bank: Bank,
    date_start: NaiveDate,
    date_end: NaiveDate,
) -> Option<&'a StatementSummary> {
    existing.iter().find(|s| s.covers(bank, date_start, date_end))
}
