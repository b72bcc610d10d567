use model::query::filter::Filter;
use tracing::warn;

/// Builds the combined field-presence filter for a scroll request.
///
/// Each non-empty list contributes a single constraint on its first field;
/// further fields in the same list are ignored. When both lists contribute,
/// the two constraints are ANDed. Returns `None` when both lists are empty.
pub fn compose<S: AsRef<str>>(must_exist: &[S], must_not_exist: &[S]) -> Option<Filter> {
    let with = first_field(must_exist, "must_exist").map(Filter::exists);
    let without = first_field(must_not_exist, "must_not_exist").map(Filter::missing);

    match (with, without) {
        (Some(with), Some(without)) => Some(with.and(without)),
        (Some(single), None) | (None, Some(single)) => Some(single),
        (None, None) => None,
    }
}

fn first_field<'a, S: AsRef<str>>(fields: &'a [S], list: &str) -> Option<&'a str> {
    let (first, rest) = fields.split_first()?;
    let first: &str = first.as_ref();
    if !rest.is_empty() {
        let ignored: Vec<&str> = rest.iter().map(|f| f.as_ref()).collect();
        warn!(
            list,
            field = first,
            ?ignored,
            "Only the first field of a filter list is applied."
        );
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn empty_lists_compose_to_nothing() {
        assert_eq!(compose(&NONE, &NONE), None);
    }

    #[test]
    fn single_must_exist_is_not_wrapped() {
        assert_eq!(compose(&["lang"], &NONE), Some(Filter::exists("lang")));
    }

    #[test]
    fn single_must_not_exist_is_not_wrapped() {
        assert_eq!(compose(&NONE, &["deleted"]), Some(Filter::missing("deleted")));
    }

    #[test]
    fn both_lists_are_anded() {
        assert_eq!(
            compose(&["lang"], &["deleted"]),
            Some(Filter::And(vec![
                Filter::exists("lang"),
                Filter::missing("deleted"),
            ]))
        );
    }

    #[test]
    fn only_first_field_of_each_list_is_used() {
        let filter = compose(&["lang", "title"], &["deleted", "spam"]).unwrap();
        assert_eq!(filter.fields(), vec!["lang", "deleted"]);
    }
}
