use crate::query::{filter::compose, spec::QuerySpec};
use model::pagination::scroll::ScrollRequest;

/// Plans the open-scroll request for a query.
pub fn plan_scroll(spec: &QuerySpec) -> ScrollRequest {
    ScrollRequest {
        indexes: spec.indexes().to_vec(),
        types: spec.types().to_vec(),
        query: spec.query().cloned(),
        filter: compose(spec.must_exist(), spec.must_not_exist()),
        size: spec.batch_size(),
        keep_alive: spec.scroll_timeout(),
        order: spec.order(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::query::{filter::Filter, order::HitOrder};
    use std::time::Duration;

    #[test]
    fn request_carries_spec_values() {
        let spec = QuerySpec::builder()
            .index("activity")
            .must_exist(["lang"])
            .batch_size(2)
            .scroll_timeout("1m")
            .random(true)
            .build()
            .unwrap();

        let request = plan_scroll(&spec);
        assert_eq!(request.indexes, vec!["activity".to_string()]);
        assert_eq!(request.size, 2);
        assert_eq!(request.keep_alive, Duration::from_secs(60));
        assert_eq!(request.order, HitOrder::Random);
        assert_eq!(request.filter, Some(Filter::exists("lang")));
    }

    #[test]
    fn no_field_lists_means_no_filter() {
        let spec = QuerySpec::builder().index("activity").build().unwrap();
        assert_eq!(plan_scroll(&spec).filter, None);
    }
}
