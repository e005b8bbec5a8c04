//! コンソール出力
//!
//! レコード一覧はテーブルで表示し、端末幅に収まらない場合はYAMLに切り替える。

use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use vpsflow_cloud::{Record, record_str, unique_key};

/// 端末幅が取得できない場合の既定値
const DEFAULT_CONSOLE_WIDTH: usize = 80;

/// YAML表示時にキーとして使う属性（優先順）
const YAML_KEYS: &[&str] = &["label", "SUBID", "SCRIPTID"];

#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    Table { header: String, rows: Vec<String> },
    Yaml(String),
}

/// 全レコードのキーの和集合（ソート済み）
pub fn headers(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 各列の幅 = ヘッダーとセルの最大文字数
pub fn column_widths(headers: &[String], records: &[Record]) -> Vec<usize> {
    headers
        .iter()
        .map(|h| {
            records
                .iter()
                .map(|r| cell(r.get(h)).chars().count())
                .fold(h.chars().count(), usize::max)
        })
        .collect()
}

/// セルの表示文字列（欠損は空文字）
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 幅を超える値を "..." 付きで切り詰める
pub fn trim(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

pub fn render_records(records: &[Record], console_width: usize) -> anyhow::Result<Rendering> {
    let headers = headers(records);
    let widths = column_widths(&headers, records);

    if widths.iter().sum::<usize>() > console_width {
        return Ok(Rendering::Yaml(keyed_yaml(records)?));
    }

    let header = format_row(headers.iter().map(String::as_str), &widths);
    let rows = records
        .iter()
        .map(|record| {
            let cells: Vec<String> = headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| trim(&cell(record.get(h)), *w))
                .collect();
            format_row(cells.iter().map(String::as_str), &widths)
        })
        .collect();

    Ok(Rendering::Table { header, rows })
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

fn keyed_yaml(records: &[Record]) -> anyhow::Result<String> {
    let mut keyed: IndexMap<String, &Record> = IndexMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let key = YAML_KEYS
            .iter()
            .find_map(|k| record_str(record, k).filter(|v| !v.is_empty()))
            .unwrap_or_else(|| i.to_string());
        // 重複したキーは SUBID（無ければ位置）で区別する
        let tag = record_str(record, "SUBID").unwrap_or_else(|| i.to_string());
        let key = unique_key(&keyed, key, &tag);
        keyed.insert(key, record);
    }
    Ok(serde_yaml::to_string(&keyed)?)
}

pub fn console_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .unwrap_or(DEFAULT_CONSOLE_WIDTH)
}

/// レコード一覧を表示（空なら何も出さない）
pub fn print_records(records: &[Record]) -> anyhow::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    match render_records(records, console_width())? {
        Rendering::Table { header, rows } => {
            println!("{}", header.bold());
            for row in rows {
                println!("{}", row);
            }
        }
        Rendering::Yaml(yaml) => print!("{}", yaml),
    }
    Ok(())
}

pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(value)?);
    Ok(())
}

/// APIレスポンスをそのまま表示
///
/// 一覧形式ならテーブル、単一オブジェクトならYAML、空なら何も出さない。
pub fn print_response(value: &Value) -> anyhow::Result<()> {
    match as_records(value) {
        Some(records) => print_records(&records),
        None if value.is_null() => Ok(()),
        None => print_yaml(value),
    }
}

/// 一覧形式のレスポンスをレコード列に変換
fn as_records(value: &Value) -> Option<Vec<Record>> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) if !map.is_empty() && map.values().all(Value::is_object) => {
            map.values().collect()
        }
        _ => return None,
    };
    items.into_iter().map(|v| v.as_object().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        as_records(&value).unwrap()
    }

    #[test]
    fn test_headers_sorted_union() {
        let rs = records(json!([
            {"name": "a", "DCID": "1"},
            {"name": "b", "country": "US"}
        ]));
        assert_eq!(headers(&rs), vec!["DCID", "country", "name"]);
    }

    #[test]
    fn test_column_widths() {
        let rs = records(json!([
            {"id": "1", "name": "New Jersey"},
            {"id": "12345", "name": "x"}
        ]));
        let hs = headers(&rs);
        assert_eq!(column_widths(&hs, &rs), vec![5, 10]);
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim("short", 10), "short");
        assert_eq!(trim("New Jersey", 7), "New ...");
        assert_eq!(trim("abc", 2), "...");
    }

    #[test]
    fn test_cell_rendering() {
        assert_eq!(cell(None), "");
        assert_eq!(cell(Some(&json!(null))), "");
        assert_eq!(cell(Some(&json!("x"))), "x");
        assert_eq!(cell(Some(&json!(512))), "512");
        assert_eq!(cell(Some(&json!(true))), "true");
        assert_eq!(cell(Some(&json!([1, 2]))), "[1,2]");
    }

    #[test]
    fn test_render_table() {
        let rs = records(json!([
            {"DCID": "1", "name": "New Jersey"},
            {"DCID": "2", "name": "Chicago"}
        ]));

        let rendering = render_records(&rs, 80).unwrap();
        assert_eq!(
            rendering,
            Rendering::Table {
                header: "DCID name".to_string(),
                rows: vec!["1    New Jersey".to_string(), "2    Chicago".to_string()],
            }
        );
    }

    #[test]
    fn test_render_falls_back_to_yaml_keyed_by_label() {
        let rs = records(json!([
            {"SUBID": "576965", "label": "web", "main_ip": "203.0.113.10"},
            {"SUBID": "576966", "label": "", "main_ip": "203.0.113.11"}
        ]));

        match render_records(&rs, 10).unwrap() {
            Rendering::Yaml(yaml) => {
                assert!(yaml.starts_with("web:\n"));
                assert!(yaml.contains("\n'576966':\n"));
            }
            other => panic!("Expected YAML, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_key_falls_back_to_scriptid_then_position() {
        let rs = records(json!([
            {"SCRIPTID": "3", "name": "boot"},
            {"name": "anonymous"}
        ]));

        match render_records(&rs, 1).unwrap() {
            Rendering::Yaml(yaml) => {
                assert!(yaml.contains("'3':\n"));
                assert!(yaml.contains("'1':\n"));
            }
            other => panic!("Expected YAML, got {:?}", other),
        }
    }

    #[test]
    fn test_yaml_keeps_records_with_colliding_keys() {
        let rs = records(json!([
            {"SUBID": "1", "name": "first"},
            {"SUBID": "576965", "label": "web"},
            {"SUBID": "576966", "label": "web"},
            {"name": "anonymous"},
            {"name": "positional"}
        ]));

        match render_records(&rs, 1).unwrap() {
            Rendering::Yaml(yaml) => {
                let keyed: IndexMap<String, Value> = serde_yaml::from_str(&yaml).unwrap();
                assert_eq!(
                    keyed.keys().collect::<Vec<_>>(),
                    vec!["1", "web", "web (576966)", "3", "4"]
                );
            }
            other => panic!("Expected YAML, got {:?}", other),
        }

        let rs = records(json!([
            {"name": "anonymous"},
            {"SUBID": "0", "name": "clash"}
        ]));
        match render_records(&rs, 1).unwrap() {
            Rendering::Yaml(yaml) => {
                let keyed: IndexMap<String, Value> = serde_yaml::from_str(&yaml).unwrap();
                assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["0", "0 (0)"]);
            }
            other => panic!("Expected YAML, got {:?}", other),
        }
    }

    #[test]
    fn test_as_records() {
        assert!(as_records(&json!({"balance": "-5.00"})).is_none());
        assert!(as_records(&json!({})).is_none());
        assert_eq!(as_records(&json!([])).unwrap().len(), 0);
        assert_eq!(
            as_records(&json!({"1": {"DCID": "1"}, "2": {"DCID": "2"}}))
                .unwrap()
                .len(),
            2
        );
    }
}
