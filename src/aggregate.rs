use std::{cmp::Ordering, collections::BTreeMap};

use crate::{infer::ScoredCandidate, sense::SenseNum, settings::AggregationPolicy};

/// Joins the translations of a `trans_list`.
pub const SEPARATOR: &str = " | ";

fn by_score_desc(a: &(&str, f64), b: &(&str, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// Joins the best scored translations with [`SEPARATOR`].
///
/// Translations are visited from the highest score down. Each one is taken
/// while `score >= threshold`, where the threshold starts at
/// `policy.threshold_start` and grows by `policy.threshold_step` with every
/// taken translation. The first rejected translation ends the list, so
/// single weak translations are kept while weak ones next to strong ones
/// are dropped.
///
/// Equal scores are ordered by the translation itself, which makes the
/// result independent of the input order.
pub fn aggregate_by_score<S: AsRef<str>>(pairs: &[(S, f64)], policy: AggregationPolicy) -> String {
    let mut sorted: Vec<(&str, f64)> = pairs.iter().map(|(t, s)| (t.as_ref(), *s)).collect();
    sorted.sort_by(by_score_desc);

    let mut threshold = policy.threshold_start;
    let mut taken: Vec<&str> = Vec::new();
    for (trans, score) in sorted {
        if score < threshold {
            break;
        }
        taken.push(trans);
        threshold += policy.threshold_step;
    }
    taken.join(SEPARATOR)
}

/// All translations of one sense of one entry.
#[derive(Clone, Debug, PartialEq)]
pub struct SenseTranslations {
    pub lexentry: Option<String>,
    pub sense_num: SenseNum,
    pub sense: Option<String>,
    pub written_rep: String,
    pub trans_list: String,
    pub score: f64,
    pub from_importance: f64,
    pub to_importance: f64,
}

type SenseKey = (Option<String>, SenseNum, Option<String>, String);

/// Groups scored candidates by `(lexentry, sense_num, sense, written_rep)`
/// and aggregates each group's translations.
///
/// Groups whose `trans_list` ends up empty are dropped.
pub fn aggregate_senses(
    scored: Vec<ScoredCandidate>,
    policy: AggregationPolicy,
) -> Vec<SenseTranslations> {
    let mut groups: BTreeMap<SenseKey, Vec<ScoredCandidate>> = BTreeMap::new();
    for s in scored {
        let c = &s.candidate;
        let key = (
            c.lexentry.clone(),
            c.sense_num,
            c.sense.clone(),
            c.written_rep.clone(),
        );
        groups.entry(key).or_default().push(s);
    }

    groups
        .into_iter()
        .filter_map(|((lexentry, sense_num, sense, written_rep), members)| {
            let pairs: Vec<(&str, f64)> = members
                .iter()
                .map(|s| (s.candidate.trans.as_str(), s.score))
                .collect();
            let trans_list = aggregate_by_score(&pairs, policy);
            if trans_list.is_empty() {
                return None;
            }
            let max = |f: fn(&ScoredCandidate) -> f64| {
                members.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
            };
            Some(SenseTranslations {
                lexentry,
                sense_num,
                sense,
                written_rep,
                trans_list,
                score: max(|s| s.score),
                from_importance: max(|s| s.candidate.from_importance),
                to_importance: max(|s| s.candidate.to_importance),
            })
        })
        .collect()
}

#[cfg(test)]
mod aggregate {
    use super::*;
    use crate::collector::TranslationCandidate;
    use pretty_assertions::assert_eq;

    fn policy() -> AggregationPolicy {
        AggregationPolicy::default()
    }

    #[test]
    fn diminishing_quota() {
        let pairs = [("Wohnung", 100.0), ("Haus", 30.0), ("Hütte", 2.0)];
        assert_eq!(aggregate_by_score(&pairs, policy()), "Wohnung | Haus");

        // a lone weak translation is still good enough
        assert_eq!(aggregate_by_score(&[("Hütte", 2.0)], policy()), "Hütte");
        assert_eq!(aggregate_by_score(&[("Hütte", 0.5)], policy()), "");
        assert_eq!(aggregate_by_score::<&str>(&[], policy()), "");
    }

    #[test]
    fn first_reject_ends_list() {
        // 5 < 6 ends the list
        let pairs = [("a", 6.0), ("b", 5.0), ("c", 5.0)];
        assert_eq!(aggregate_by_score(&pairs, policy()), "a");
    }

    #[test]
    fn order_independent() {
        let pairs = [("gå", 35.0), ("åka", 10.0), ("vandra", 35.0), ("resa", 3.0)];
        let expected = aggregate_by_score(&pairs, policy());
        assert_eq!(expected, "gå | vandra");

        let mut reversed = pairs;
        reversed.reverse();
        assert_eq!(aggregate_by_score(&reversed, policy()), expected);
        let rotated = [pairs[2], pairs[0], pairs[3], pairs[1]];
        assert_eq!(aggregate_by_score(&rotated, policy()), expected);
    }

    fn scored(sense_num: u32, trans: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            candidate: TranslationCandidate {
                lexentry: Some("gehen__Verb__1".into()),
                sense_num: SenseNum::Numbered {
                    number: sense_num,
                    letter: None,
                },
                sense: None,
                written_rep: "gehen".into(),
                trans: trans.into(),
                from_importance: 0.8,
                to_importance: score / 100.0,
                all_lexentries: vec!["gehen__Verb__1".into()],
            },
            score,
        }
    }

    #[test]
    fn groups_per_sense() {
        let rows = aggregate_senses(
            vec![
                scored(2, "åka", 10.0),
                scored(1, "gå", 35.0),
                scored(1, "vandra", 10.0),
                scored(3, "x", 0.0),
            ],
            policy(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sense_num.to_string(), "01");
        assert_eq!(rows[0].trans_list, "gå | vandra");
        assert_eq!(rows[0].score, 35.0);
        assert_eq!(rows[0].to_importance, 0.35);
        assert_eq!(rows[1].trans_list, "åka");
    }
}
