use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::RawTransaction;
use crate::text::StatementText;
use crate::utils::{parse_amount, parse_date_dmy, parse_time_hm};

/// Первая строка операции: дата операции, дата списания, сумма операции,
/// сумма в валюте карты, начало описания, последние 4 цифры карты
static PRIMARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{2}\.\d{2}\.\d{4})\s+(\d{2}\.\d{2}\.\d{4})\s+([+\-][\d\s.,]+)\s*₽\s+([+\-][\d\s.,]+)\s*₽\s+(.+?)\s+(\d{4})$",
    )
    .unwrap()
});

/// Вторая строка операции: время операции, время списания, хвост описания
static CONTINUATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}:\d{2})\s+(\d{2}:\d{2})\s+(.+)$").unwrap());

/// Маркеры футера: реквизиты, сводные итоги, прощальная подпись.
/// После первого такого маркера строки операциями не считаются,
/// даже если случайно совпали с паттернами.
static FOOTER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^АО «ТБанк",
        r"(?i)^БИК",
        r"(?i)^ИНН",
        r"(?i)^Пополнения[:\s]",
        r"(?i)^Расход[:\s]",
        r"(?i)^Итого",
        r"(?i)^С уважением",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn is_footer(line: &str) -> bool {
    FOOTER_RES.iter().any(|p| p.is_match(line))
}

/// Разбирает карточную выписку Т-Банка.
///
/// Операция занимает минимум две физические строки; все последующие строки
/// до следующего совпадения паттернов или маркера футера присоединяются к
/// описанию через одиночные пробелы. Строка с нечитаемой датой или суммой
/// пропускается, сканирование продолжается.
pub fn parse(text: &StatementText) -> Vec<RawTransaction> {
    let lines = text.lines();
    let mut txs = Vec::new();

    let mut i = 0;
    while i + 1 < lines.len() {
        if is_footer(lines[i]) {
            break;
        }

        let primary = PRIMARY_RE.captures(lines[i]);
        let continuation = CONTINUATION_RE.captures(lines[i + 1]);
        let (Some(m1), Some(m2)) = (primary, continuation) else {
            i += 1;
            continue;
        };

        let date = match parse_date_dmy(&m1[1]) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("skipping record with unparsable date '{}': {e}", &m1[1]);
                i += 1;
                continue;
            }
        };

        // знак берётся прямо из текста: расходы уже отрицательные
        let amount = match parse_amount(&m1[3]) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("skipping record with unparsable amount '{}': {e}", &m1[3]);
                i += 1;
                continue;
            }
        };

        let time = parse_time_hm(&m2[1]).ok();

        let mut description = format!("{} {}", &m1[5], &m2[3]);
        let mut j = i + 2;
        while j < lines.len() {
            if PRIMARY_RE.is_match(lines[j])
                || CONTINUATION_RE.is_match(lines[j])
                || is_footer(lines[j])
            {
                break;
            }
            description.push(' ');
            description.push_str(lines[j]);
            j += 1;
        }

        txs.push(RawTransaction {
            date,
            time,
            amount,
            description: description.trim().to_string(),
        });
        i = j;
    }

    txs
}
