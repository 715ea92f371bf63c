//! Grouping of records by template.

use crate::record::Record;

/// Records sharing a template name, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateGroup {
    pub template: String,
    /// Indices into the input record list.
    pub members: Vec<usize>,
}

/// Groups records by declared template name.
///
/// Groups appear in first-seen order and members keep their input order.
pub fn group_by_template(records: &[Record]) -> Vec<TemplateGroup> {
    let mut groups: Vec<TemplateGroup> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let template = record.template_name();
        match groups.iter().position(|g| g.template == template) {
            Some(i) => groups[i].members.push(index),
            None => groups.push(TemplateGroup {
                template,
                members: vec![index],
            }),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_first_seen_order_and_stable_members() {
        let records = vec![
            fixtures::record(1, "POS-001", "A"),
            fixtures::record(2, "POS-002", "B"),
            fixtures::record(3, "POS-003", "A"),
            fixtures::record(4, "POS-004", "C"),
            fixtures::record(5, "POS-005", "B"),
        ];

        let groups = group_by_template(&records);
        let summary: Vec<(&str, Vec<usize>)> = groups
            .iter()
            .map(|g| (g.template.as_str(), g.members.clone()))
            .collect();

        assert_eq!(
            summary,
            vec![("A", vec![0, 2]), ("B", vec![1, 4]), ("C", vec![3])]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_template(&[]).is_empty());
    }
}
