use tracing::info;

use crate::{aggregate::SenseTranslations, aggregate::SEPARATOR, sense::SenseNum};

/// One row of the served translation table.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationGroup {
    pub lexentry: Option<String>,
    pub written_rep: String,
    pub part_of_speech: Option<String>,
    pub trans_list: String,
    /// Earliest sense of the group, used for display order.
    pub min_sense_num: SenseNum,
    pub sense_list: Option<String>,
    pub score: f64,
    /// Max of `from_importance * to_importance` over the group.
    pub importance: f64,
}

/// Groups resolved rows by `(lexentry, written_rep, trans_list)`.
///
/// Rows are sorted by `(lexentry, written_rep, trans_list, sense_num,
/// score desc)` before grouping; the distinct senses of a group are joined
/// in that order. The returned groups are ordered by
/// `(lexentry, min_sense_num, written_rep, trans_list)`.
///
/// `part_of_speech` is left empty for the caller to fill in.
pub fn group_translations(mut rows: Vec<SenseTranslations>) -> Vec<TranslationGroup> {
    rows.sort_by(|a, b| {
        (&a.lexentry, &a.written_rep, &a.trans_list, a.sense_num)
            .cmp(&(&b.lexentry, &b.written_rep, &b.trans_list, b.sense_num))
            .then_with(|| b.score.total_cmp(&a.score))
    });

    let mut groups: Vec<TranslationGroup> = Vec::new();
    let mut senses: Vec<Vec<String>> = Vec::new();
    for row in rows {
        let importance = row.from_importance * row.to_importance;
        let same_group = groups.last().is_some_and(|g| {
            g.lexentry == row.lexentry
                && g.written_rep == row.written_rep
                && g.trans_list == row.trans_list
        });
        if same_group {
            if let (Some(group), Some(group_senses)) = (groups.last_mut(), senses.last_mut()) {
                group.min_sense_num = group.min_sense_num.min(row.sense_num);
                group.score = group.score.max(row.score);
                group.importance = group.importance.max(importance);
                if let Some(sense) = row.sense {
                    if !group_senses.contains(&sense) {
                        group_senses.push(sense);
                    }
                }
            }
            continue;
        }
        senses.push(row.sense.into_iter().collect());
        groups.push(TranslationGroup {
            lexentry: row.lexentry,
            written_rep: row.written_rep,
            part_of_speech: None,
            trans_list: row.trans_list,
            min_sense_num: row.sense_num,
            sense_list: None,
            score: row.score,
            importance,
        });
    }

    for (group, group_senses) in groups.iter_mut().zip(senses) {
        if !group_senses.is_empty() {
            group.sense_list = Some(group_senses.join(SEPARATOR));
        }
    }
    groups.sort_by(|a, b| {
        (&a.lexentry, a.min_sense_num, &a.written_rep, &a.trans_list).cmp(&(
            &b.lexentry,
            b.min_sense_num,
            &b.written_rep,
            &b.trans_list,
        ))
    });
    info!(groups = groups.len(), "grouped translations");
    groups
}
