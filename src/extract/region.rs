//! content-item 1ブロック分のラベル再構成
//!
//! テキスト断片を文書順に走査し、末尾が `:` の断片をラベルとしてスタックに積み、
//! 先頭が数字か `$` の断片を値としてスタック全体を連結したラベルに対応付ける。

use std::collections::BTreeMap;

/// ラベル → 生の値
pub type FieldRow = BTreeMap<String, String>;

/// 近隣地区名を含むラベル断片の置換先
pub const SELF_REFERENCE: &str = "Here";

/// 値を記録した後のラベルスタックの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStackMode {
    /// 値を記録してもスタックを縮めない。
    /// 既存データセットと同じく、同じブロック内の後続の値は前のラベルを全て引き継ぐ。
    #[default]
    Cumulative,
    /// 値を記録するたびに直近のラベルを1つ取り除く
    PopOnValue,
}

/// ブロック走査の結果種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// 値が1つもなかった。積まれたラベルは捨てられる
    NoValues { dropped_labels: usize },
    /// ラベルなしの値があった（空文字ラベルで記録）
    UnlabeledValues { count: usize },
    Extracted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionScan {
    pub fields: FieldRow,
    pub outcome: ScanOutcome,
}

pub fn is_label(fragment: &str) -> bool {
    fragment.ends_with(':')
}

pub fn is_value(fragment: &str) -> bool {
    fragment
        .chars()
        .next()
        .is_some_and(|c| c.is_numeric() || c == '$')
}

/// スタックの断片を下から順に区切りなしで連結する。
/// `name` を含む断片は丸ごと [`SELF_REFERENCE`] に置き換える。
pub fn build_label(stack: &[&str], name: &str) -> String {
    stack
        .iter()
        .map(|&layer| {
            if !name.is_empty() && layer.contains(name) {
                SELF_REFERENCE
            } else {
                layer
            }
        })
        .collect()
}

/// 1ブロック分の断片を走査する
pub fn scan_region<S: AsRef<str>>(fragments: &[S], name: &str, mode: LabelStackMode) -> RegionScan {
    let mut stack: Vec<&str> = Vec::new();
    let mut fields = FieldRow::new();
    let mut values = 0usize;
    let mut unlabeled = 0usize;

    for raw in fragments {
        let fragment = raw.as_ref().trim();
        if fragment.is_empty() {
            continue;
        }

        if is_label(fragment) {
            stack.push(fragment);
        } else if is_value(fragment) {
            let label = build_label(&stack, name);
            if label.is_empty() {
                unlabeled += 1;
            }
            fields.insert(label, fragment.to_string());
            values += 1;

            if mode == LabelStackMode::PopOnValue {
                stack.pop();
            }
        }
    }

    let outcome = if values == 0 {
        ScanOutcome::NoValues {
            dropped_labels: stack.len(),
        }
    } else if unlabeled > 0 {
        ScanOutcome::UnlabeledValues { count: unlabeled }
    } else {
        ScanOutcome::Extracted
    };

    RegionScan { fields, outcome }
}
