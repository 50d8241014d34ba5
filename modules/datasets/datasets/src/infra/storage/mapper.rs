use datasets_sdk::Dataset;
use sea_orm::ActiveValue::Set;

use super::entity::{ActiveModel, DependencyList, Model};

impl From<Model> for Dataset {
    fn from(m: Model) -> Self {
        Self {
            dataset_id: m.dataset_id,
            dataset_name: m.dataset_name,
            dataset_type: m.dataset_type,
            layer: m.layer,
            upstream_dependencies: m.upstream_dependencies.0,
            status: m.status,
            created_ts: m.created_ts,
            updated_ts: m.updated_ts,
        }
    }
}

impl From<&Dataset> for ActiveModel {
    fn from(d: &Dataset) -> Self {
        Self {
            dataset_id: Set(d.dataset_id.clone()),
            dataset_name: Set(d.dataset_name.clone()),
            dataset_type: Set(d.dataset_type.clone()),
            layer: Set(d.layer.clone()),
            upstream_dependencies: Set(DependencyList(d.upstream_dependencies.clone())),
            status: Set(d.status.clone()),
            created_ts: Set(d.created_ts),
            updated_ts: Set(d.updated_ts),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;
    use time::macros::datetime;

    fn sample() -> Dataset {
        Dataset {
            dataset_id: "Y".to_owned(),
            dataset_name: "dbx_catalog.silver.y".to_owned(),
            dataset_type: "delta".to_owned(),
            layer: "silver".to_owned(),
            upstream_dependencies: vec!["X".to_owned(), "W".to_owned()],
            status: "active".to_owned(),
            created_ts: datetime!(2024-05-01 10:00:00 UTC),
            updated_ts: datetime!(2024-05-02 11:30:00 UTC),
        }
    }

    #[test]
    fn active_model_sets_every_column() {
        let am = ActiveModel::from(&sample());
        assert_eq!(am.dataset_id, ActiveValue::Set("Y".to_owned()));
        assert_eq!(
            am.upstream_dependencies,
            ActiveValue::Set(DependencyList(vec!["X".to_owned(), "W".to_owned()]))
        );
        assert_eq!(
            am.updated_ts,
            ActiveValue::Set(datetime!(2024-05-02 11:30:00 UTC))
        );
    }

    #[test]
    fn model_keeps_dependency_order() {
        let d = sample();
        let model = Model {
            dataset_id: d.dataset_id.clone(),
            dataset_name: d.dataset_name.clone(),
            dataset_type: d.dataset_type.clone(),
            layer: d.layer.clone(),
            upstream_dependencies: DependencyList(d.upstream_dependencies.clone()),
            status: d.status.clone(),
            created_ts: d.created_ts,
            updated_ts: d.updated_ts,
        };
        assert_eq!(Dataset::from(model), d);
    }

    #[test]
    fn dependency_list_is_a_plain_json_array() {
        let json = serde_json::to_string(&DependencyList(vec!["a".to_owned()])).unwrap();
        assert_eq!(json, r#"["a"]"#);
    }
}
