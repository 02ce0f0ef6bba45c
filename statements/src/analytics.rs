mod utils;

use std::collections::{BTreeMap, BTreeSet};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::{Category, StoredTransaction};
use crate::utils::{first_day_of_month, last_day_of_month, parse_stored_date, round1, round2};
use utils::*;

/// Сумма трат по одной категории
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: Category,
    pub amount: f64,
}

/// Фактический период, попавший в расчёт: min/max даты включённых
/// операций, а не номинальные границы окна
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsPeriod {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Сводка трат по категориям за скользящие 30 дней
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    #[serde(rename = "totalSpent")]
    pub total_spent: f64,
    pub period: StatsPeriod,
    pub categories: Vec<CategoryAmount>,
}

/// Строка месячной разбивки.
///
/// Именованные категории сворачиваются в сумму за месяц; «Другие» идут
/// по одной строке на операцию с её описанием — эта асимметрия нужна,
/// чтобы пользователь мог разобрать несведённые траты.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month: &'static str,
    pub category: Category,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Строка доходов: всегда по одной операции, никогда не суммируется
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeRow {
    pub month: &'static str,
    pub category: Category,
    pub amount: f64,
    pub description: String,
}

/// Совет по категории за текущий месяц против прошлого
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    pub category: Category,
    pub change_percent: f64,
    pub share_percent: f64,
    /// текст совета; формулировка выбирается [`PhrasePicker`]-ом и потому
    /// не детерминирована — числовые поля детерминированы всегда
    pub advice: String,
}

/// Выбор варианта формулировки совета.
///
/// Случайность влияет только на прозу: в проде — [`ClockPicker`],
/// в тестах — [`FixedPicker`] с фиксированным индексом.
pub trait PhrasePicker {
    fn pick(&self, variants: usize) -> usize;
}

/// Псевдослучайный выбор от субсекундных часов
#[derive(Debug, Default)]
pub struct ClockPicker;

impl PhrasePicker for ClockPicker {
    fn pick(&self, variants: usize) -> usize {
        if variants == 0 {
            return 0;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as usize)
            .unwrap_or(0);
        nanos % variants
    }
}

/// Детерминированный выбор для тестов
#[derive(Debug)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick(&self, variants: usize) -> usize {
        if variants == 0 { 0 } else { self.0 % variants }
    }
}

/// Траты по категориям за скользящие 30 дней от `now`.
///
/// «Пополнение» и неотрицательные суммы исключаются; суммы — абсолютные.
/// Пустой результат — нулевой итог, пустой период и пустой список.
pub fn category_stats(txs: &[StoredTransaction], now: NaiveDate) -> CategoryStats {
    let cutoff = now - Days::new(30);

    let mut expenses: BTreeMap<Category, f64> = BTreeMap::new();
    let mut total_spent = 0.0;
    let mut dates: Vec<NaiveDate> = Vec::new();

    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };
        if date < cutoff || tx.category == Category::TopUp || tx.amount > 0.0 {
            continue;
        }

        *expenses.entry(tx.category).or_insert(0.0) += tx.amount.abs();
        total_spent += tx.amount.abs();
        dates.push(date);
    }

    CategoryStats {
        total_spent: round2(total_spent),
        period: StatsPeriod {
            start: dates.iter().min().map(|d| format_dmy(*d)),
            end: dates.iter().max().map(|d| format_dmy(*d)),
        },
        categories: expenses
            .into_iter()
            .map(|(category, amount)| CategoryAmount {
                category,
                amount: round2(amount),
            })
            .collect(),
    }
}

/// Месячная разбивка расходов за календарное полугодие (см. DESIGN.md:
/// принят полугодичный вариант окна, не скользящие 6 месяцев).
pub fn monthly_stats(txs: &[StoredTransaction], now: NaiveDate) -> Vec<MonthlyRow> {
    let (start_month, end_month) = monthly_window(now);
    let start_cutoff = first_day_of_month(now.year(), start_month);
    let end_cutoff = last_day_of_month(now.year(), end_month);

    let mut monthly: BTreeMap<u32, BTreeMap<Category, Vec<(f64, &str)>>> = BTreeMap::new();

    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };
        if date < start_cutoff || date > end_cutoff {
            continue;
        }
        if tx.amount > 0.0 || tx.category == Category::TopUp {
            continue;
        }

        monthly
            .entry(date.month())
            .or_default()
            .entry(tx.category)
            .or_default()
            .push((tx.amount.abs(), &tx.description));
    }

    let mut rows = Vec::new();
    for month in start_month..=end_month {
        let Some(by_category) = monthly.get(&month) else {
            continue;
        };
        let label = month_label(month);

        for (category, entries) in by_category {
            if *category == Category::Other {
                for (amount, description) in entries {
                    rows.push(MonthlyRow {
                        month: label,
                        category: *category,
                        amount: round2(*amount),
                        description: Some((*description).to_string()),
                    });
                }
            } else {
                let total: f64 = entries.iter().map(|(amount, _)| amount).sum();
                rows.push(MonthlyRow {
                    month: label,
                    category: *category,
                    amount: round2(total),
                    description: None,
                });
            }
        }
    }
    rows
}

/// Доходы («Пополнение», положительные суммы) за календарное полугодие,
/// по одной строке на операцию
pub fn income_stats(txs: &[StoredTransaction], now: NaiveDate) -> Vec<IncomeRow> {
    let (start_month, end_month) = income_window(now);
    let start_cutoff = first_day_of_month(now.year(), start_month);
    let end_cutoff = last_day_of_month(now.year(), end_month);

    let mut monthly: BTreeMap<u32, Vec<(f64, &str)>> = BTreeMap::new();

    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };
        if date < start_cutoff || date > end_cutoff {
            continue;
        }
        if tx.amount <= 0.0 || tx.category != Category::TopUp {
            continue;
        }

        monthly
            .entry(date.month())
            .or_default()
            .push((tx.amount, &tx.description));
    }

    let mut rows = Vec::new();
    for (month, entries) in &monthly {
        for (amount, description) in entries {
            rows.push(IncomeRow {
                month: month_label(*month),
                category: Category::TopUp,
                amount: round2(*amount),
                description: (*description).to_string(),
            });
        }
    }
    rows
}

fn emoji_for(category: Category) -> &'static str {
    match category {
        Category::Coffee => "☕️",
        Category::Stores => "🛍️",
        Category::Utilities => "💡",
        Category::Entertainment => "🎬",
        Category::Delivery => "🍔",
        Category::Transport => "🚌",
        Category::Other => "📊",
        _ => "💸",
    }
}

/// Сравнение текущего календарного месяца (1-е..`now`) с прошлым (целиком).
///
/// «Переводы» и «Пополнение» советов не получают; категории с нулевыми
/// тратами в этом месяце и с долей ниже 1% пропускаются. Совет выдаётся
/// при росте свыше 25% или доле свыше 30%; рост от нулевой базы считается
/// за 100%, доля при нулевом итоге — за 0%. Результат отсортирован по
/// убыванию доли.
pub fn monthly_advice(
    txs: &[StoredTransaction],
    now: NaiveDate,
    picker: &dyn PhrasePicker,
) -> Vec<Advice> {
    let first_this_month = first_day_of_month(now.year(), now.month());
    let first_last_month = if now.month() == 1 {
        first_day_of_month(now.year() - 1, 12)
    } else {
        first_day_of_month(now.year(), now.month() - 1)
    };
    let last_last_month = first_this_month - Days::new(1);

    let mut this_sums: BTreeMap<Category, f64> = BTreeMap::new();
    let mut last_sums: BTreeMap<Category, f64> = BTreeMap::new();
    let mut total_this = 0.0;

    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };

        let amount = tx.amount.abs();
        if date >= first_this_month && date <= now {
            *this_sums.entry(tx.category).or_insert(0.0) += amount;
            total_this += amount;
        } else if date >= first_last_month && date <= last_last_month {
            *last_sums.entry(tx.category).or_insert(0.0) += amount;
        }
    }

    let categories: BTreeSet<Category> =
        this_sums.keys().chain(last_sums.keys()).copied().collect();

    let mut advice_list = Vec::new();
    for category in categories {
        if matches!(category, Category::Transfers | Category::TopUp) {
            continue;
        }

        let amount_this = this_sums.get(&category).copied().unwrap_or(0.0);
        let amount_last = last_sums.get(&category).copied().unwrap_or(0.0);

        if amount_this == 0.0 {
            continue;
        }

        let change_percent = if amount_last > 0.0 {
            (amount_this - amount_last) / amount_last * 100.0
        } else {
            100.0
        };
        let share_percent = if total_this > 0.0 {
            amount_this / total_this * 100.0
        } else {
            0.0
        };

        // незначительные категории не засоряют советы
        if share_percent < 1.0 {
            continue;
        }

        if change_percent > 25.0 || share_percent > 30.0 {
            let phrases = [
                format!("Это {share_percent:.0}% всех расходов — подумайте, нужно ли это."),
                format!("Категория заняла {share_percent:.0}% от всего — может, стоит сократить?"),
                format!("На это ушло {share_percent:.0}% от всех трат — подумайте о приоритетах."),
                format!("Целых {share_percent:.0}% расходов! Возможно, стоит пересмотреть это."),
            ];
            let tail = &phrases[picker.pick(phrases.len())];
            let advice = format!(
                "{} Вы тратите на '{}' на {change_percent:.0}% больше, чем в прошлом месяце. {tail}",
                emoji_for(category),
                category.label(),
            );

            advice_list.push(Advice {
                category,
                change_percent: round1(change_percent),
                share_percent: round1(share_percent),
                advice,
            });
        }
    }

    advice_list.sort_by(|a, b| b.share_percent.total_cmp(&a.share_percent));
    advice_list
}
