use chrono::{Datelike, NaiveDate};

/// Трёхбуквенные русские метки месяцев — статическая таблица, не вычисляется
const MONTHS_RU: [&str; 12] = [
    "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
];

pub(super) fn month_label(month: u32) -> &'static str {
    MONTHS_RU[(month - 1) as usize]
}

pub(super) fn format_dmy(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Окно месячной разбивки: календарное полугодие, обрезанное текущим
/// месяцем — январь..текущий в первом полугодии, текущий..декабрь во втором
pub(super) fn monthly_window(now: NaiveDate) -> (u32, u32) {
    let month = now.month();
    if month <= 6 { (1, month) } else { (month, 12) }
}

/// Окно доходов: календарное полугодие целиком
pub(super) fn income_window(now: NaiveDate) -> (u32, u32) {
    if now.month() <= 6 { (1, 6) } else { (7, 12) }
}
