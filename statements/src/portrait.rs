use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{Category, StoredTransaction};
use crate::utils::{first_day_of_month, last_day_of_month, parse_stored_date, round2};

/// (эмодзи, настроение) по категории. Категории без настроения
/// (транспорт, переводы) в таблице отсутствуют намеренно.
fn mood_for(category: Category) -> Option<(&'static str, &'static str)> {
    match category {
        Category::Coffee => Some(("☕️", "Беззаботный")),
        Category::Delivery => Some(("🍔", "Спонтанный")),
        Category::Stores => Some(("🛍️", "Практичный")),
        Category::Entertainment => Some(("🎬", "Расслабленный")),
        Category::Utilities => Some(("📉", "Сдержанный")),
        Category::TopUp => Some(("💰", "Сберегательный")),
        Category::Other => Some(("📊", "Уравновешенный")),
        _ => None,
    }
}

const MONTHS_FULL_RU: [&str; 12] = [
    "Январь",
    "Февраль",
    "Март",
    "Апрель",
    "Май",
    "Июнь",
    "Июль",
    "Август",
    "Сентябрь",
    "Октябрь",
    "Ноябрь",
    "Декабрь",
];

/// Финансовый портрет календарного месяца
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MonthPortrait {
    NoData {
        message: String,
    },
    Ok {
        month: &'static str,
        year: i32,
        /// доля крупнейшей категории меньше половины трат
        balanced: bool,
        top_categories: Vec<Category>,
        emoji: &'static str,
        mood: &'static str,
        summary: String,
    },
}

/// Группа дней с похожим уровнем трат
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCluster {
    pub label: String,
    /// центр кластера — типичная дневная сумма
    pub limit: f64,
    pub days_total: usize,
    pub weekdays: usize,
    pub weekends: usize,
}

/// Составляет портрет месяца по расходам.
///
/// «Переводы» в портрет не входят: движение денег между своими счетами
/// ничего не говорит о привычках. Топ-3 категорий считается по числу
/// операций, а не по сумме; настроение — первая категория из топ-3,
/// нашедшаяся в таблице настроений, иначе «Уравновешенный».
pub fn portrait_of_month(txs: &[StoredTransaction], month: u32, year: i32) -> MonthPortrait {
    let first = first_day_of_month(year, month);
    let last = last_day_of_month(year, month);
    let month_name = MONTHS_FULL_RU[(month - 1) as usize];

    let mut sums: BTreeMap<Category, f64> = BTreeMap::new();
    let mut counts: BTreeMap<Category, usize> = BTreeMap::new();

    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };
        if date < first || date > last || tx.amount >= 0.0 || tx.category == Category::Transfers {
            continue;
        }
        *sums.entry(tx.category).or_insert(0.0) += tx.amount.abs();
        *counts.entry(tx.category).or_insert(0) += 1;
    }

    if sums.is_empty() {
        return MonthPortrait::NoData {
            message: format!("⚪️ {month_name} — нет расходов для анализа"),
        };
    }

    let total: f64 = sums.values().sum();
    let top_spend = sums.values().fold(0.0_f64, |a, &b| a.max(b));
    let balanced = top_spend / total < 0.5;

    // сортировка по убыванию числа операций; при равенстве —
    // порядок объявления категорий, чтобы результат был стабилен
    let mut by_count: Vec<(Category, usize)> = counts.into_iter().collect();
    by_count.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let top_categories: Vec<Category> = by_count.iter().take(3).map(|(c, _)| *c).collect();

    let (emoji, mood) = top_categories
        .iter()
        .find_map(|c| mood_for(*c))
        .unwrap_or(("📊", "Уравновешенный"));

    let top_labels: Vec<&str> = top_categories.iter().map(|c| c.label()).collect();
    let balance_word = if balanced {
        "сбалансированный"
    } else {
        "разбалансированный"
    };
    let summary = format!(
        "{emoji} {month_name} — {balance_word} месяц. Топ категории: {}. Настроение: {mood}.",
        top_labels.join(", "),
    );

    MonthPortrait::Ok {
        month: month_name,
        year,
        balanced,
        top_categories,
        emoji,
        mood,
        summary,
    }
}

/// Одномерный k-means Ллойда с детерминированной инициализацией.
///
/// Центры стартуют с равноотстоящих квантилей отсортированных значений,
/// поэтому при одинаковом входе результат всегда одинаков. Возвращает
/// центры по возрастанию и метку кластера для каждого значения.
fn kmeans_1d(values: &[f64], k: usize) -> (Vec<f64>, Vec<usize>) {
    debug_assert!(k >= 1 && k <= values.len());

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut centers: Vec<f64> = if k == 1 {
        vec![sorted[sorted.len() / 2]]
    } else {
        (0..k)
            .map(|i| sorted[i * (sorted.len() - 1) / (k - 1)])
            .collect()
    };

    let mut labels = vec![0usize; values.len()];
    for _ in 0..100 {
        let mut changed = false;
        for (idx, &v) in values.iter().enumerate() {
            let nearest = centers
                .iter()
                .enumerate()
                .min_by(|a, b| (a.1 - v).abs().total_cmp(&(b.1 - v).abs()))
                .map(|(i, _)| i)
                .unwrap_or(0);
            if labels[idx] != nearest {
                labels[idx] = nearest;
                changed = true;
            }
        }

        let mut sums = vec![0.0f64; k];
        let mut cnts = vec![0usize; k];
        for (idx, &v) in values.iter().enumerate() {
            sums[labels[idx]] += v;
            cnts[labels[idx]] += 1;
        }
        for i in 0..k {
            if cnts[i] > 0 {
                centers[i] = sums[i] / cnts[i] as f64;
            }
        }

        if !changed {
            break;
        }
    }

    // перенумерация по возрастанию центров
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| centers[a].total_cmp(&centers[b]));
    let mut relabel = vec![0usize; k];
    for (new, &old) in order.iter().enumerate() {
        relabel[old] = new;
    }

    let ordered_centers: Vec<f64> = order.iter().map(|&i| centers[i]).collect();
    let ordered_labels: Vec<usize> = labels.iter().map(|&l| relabel[l]).collect();
    (ordered_centers, ordered_labels)
}

const CLUSTER_NAMES: [&str; 3] = ["Экономные", "Сбалансированные", "Щедрые"];

/// Группирует дни месяца по уровню дневных трат.
///
/// Кластеров `min(3, дней с тратами)`; пустой месяц — пустой список.
pub fn cluster_days(txs: &[StoredTransaction], month: u32, year: i32) -> Vec<DayCluster> {
    let first = first_day_of_month(year, month);
    let last = last_day_of_month(year, month);

    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in txs {
        let Some(date) = parse_stored_date(&tx.date) else {
            continue;
        };
        if date >= first && date <= last && tx.amount < 0.0 {
            *daily.entry(date).or_insert(0.0) += tx.amount.abs();
        }
    }

    if daily.is_empty() {
        return Vec::new();
    }

    let days: Vec<NaiveDate> = daily.keys().copied().collect();
    let totals: Vec<f64> = daily.values().copied().collect();
    let k = 3.min(totals.len());

    let (centers, labels) = kmeans_1d(&totals, k);

    let mut clusters: Vec<Vec<NaiveDate>> = vec![Vec::new(); k];
    for (idx, &label) in labels.iter().enumerate() {
        clusters[label].push(days[idx]);
    }

    // при совпадающих дневных суммах кластер может остаться пустым;
    // такие в отчёт не попадают, имена идут по оставшимся
    clusters
        .into_iter()
        .zip(&centers)
        .filter(|(cluster_days, _)| !cluster_days.is_empty())
        .enumerate()
        .map(|(idx, (cluster_days, center))| {
            let weekdays = cluster_days
                .iter()
                .filter(|d| d.weekday().num_days_from_monday() < 5)
                .count();
            let label = CLUSTER_NAMES
                .get(idx)
                .map(|s| (*s).to_string())
                .unwrap_or_else(|| format!("Тип {}", idx + 1));

            DayCluster {
                label,
                limit: round2(*center),
                days_total: cluster_days.len(),
                weekdays,
                weekends: cluster_days.len() - weekdays,
            }
        })
        .collect()
}
