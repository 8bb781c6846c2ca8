//! Built-in registry tables.

use std::collections::BTreeMap;

use crate::registry::{FieldMap, IndexConfig, ValueMap};

type Environments = BTreeMap<String, BTreeMap<String, IndexConfig>>;

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn values(pairs: &[(&str, &[&str])]) -> ValueMap {
    pairs
        .iter()
        .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
        .collect()
}

fn index(
    pattern: &str,
    rollover: &str,
    retention: &str,
    max_size: u32,
    fields: FieldMap,
    level_map: Option<ValueMap>,
) -> IndexConfig {
    IndexConfig {
        index_type: String::new(),
        pattern: pattern.into(),
        rollover: rollover.into(),
        retention: retention.into(),
        default_size: 100,
        max_size,
        timeout_ms: 30_000,
        fields,
        mappings: level_map
            .map(|m| BTreeMap::from([("level".to_string(), m)]))
            .unwrap_or_default(),
    }
}

const APP_FIELDS: &[(&str, &str)] = &[
    ("timestamp", "@timestamp"),
    ("level", "json.levelname"),
    ("message", "json.message"),
    ("pod", "json.hostname"),
    ("service", "json.service_name"),
    ("module", "json.module"),
    ("trace_id", "json.trace_id"),
    ("request_id", "json.request_id"),
    ("user_id", "json.user_id"),
    ("mobile_user_id", "json.mobile_user_id"),
    ("request_time", "json.extra.request_time"),
    ("environment", "json.environment"),
    ("deployment", "ct_deployment"),
    ("namespace", "ct_feature"),
    ("application", "applicationName"),
];

fn app_levels() -> ValueMap {
    values(&[
        ("ERROR", &["error", "ERROR", "E", "err", "ERR"]),
        ("WARNING", &["warn", "WARNING", "W", "warning", "WARN"]),
        ("INFO", &["info", "INFO", "I"]),
        ("DEBUG", &["debug", "DEBUG", "D"]),
        (
            "CRITICAL",
            &["critical", "CRITICAL", "C", "crit", "CRIT", "fatal", "FATAL"],
        ),
    ])
}

fn production_like() -> BTreeMap<String, IndexConfig> {
    BTreeMap::from([
        (
            "app_logs".to_string(),
            index(
                "app-logs*",
                "daily",
                "30d",
                1000,
                fields(APP_FIELDS),
                Some(app_levels()),
            ),
        ),
        (
            "infra_logs".to_string(),
            index(
                "infrastructure-prod-*",
                "daily",
                "14d",
                500,
                fields(&[
                    ("timestamp", "@timestamp"),
                    ("level", "level"),
                    ("message", "message"),
                    ("host", "host.name"),
                    ("component", "component"),
                    ("resource_type", "kubernetes.resource.type"),
                    ("resource_name", "kubernetes.resource.name"),
                    ("cpu_usage", "system.cpu.usage"),
                    ("memory_usage", "system.memory.usage"),
                    ("disk_usage", "system.disk.usage"),
                    ("network_in", "system.network.in.bytes"),
                    ("network_out", "system.network.out.bytes"),
                ]),
                None,
            ),
        ),
        (
            "security_logs".to_string(),
            index(
                "security-prod-*",
                "daily",
                "90d",
                500,
                fields(&[
                    ("timestamp", "@timestamp"),
                    ("event_type", "event.type"),
                    ("action", "event.action"),
                    ("outcome", "event.outcome"),
                    ("user", "user.name"),
                    ("source_ip", "source.ip"),
                    ("target_resource", "resource.name"),
                    ("risk_score", "risk.score"),
                ]),
                None,
            ),
        ),
        (
            "audit_logs".to_string(),
            index(
                "audit-prod-*",
                "monthly",
                "365d",
                500,
                fields(&[
                    ("timestamp", "@timestamp"),
                    ("action", "event.action"),
                    ("resource_type", "resource.type"),
                    ("resource_id", "resource.id"),
                    ("user", "user.name"),
                    ("source_ip", "source.ip"),
                    ("changes", "event.changes"),
                    ("reason", "event.reason"),
                    ("compliance_tags", "tags.compliance"),
                ]),
                None,
            ),
        ),
    ])
}

pub(crate) fn environments() -> Environments {
    let mut production = production_like();
    if let Some(app) = production.get_mut("app_logs") {
        app.pattern = "app-logs-prod-*".into();
    }

    let staging = BTreeMap::from([(
        "app_logs".to_string(),
        index(
            "app-logs-staging-*",
            "daily",
            "14d",
            1000,
            fields(APP_FIELDS),
            Some(app_levels()),
        ),
    )]);

    let mut dev_app = index(
        "app-logs-dev-*",
        "weekly",
        "7d",
        200,
        fields(&[
            ("timestamp", "@timestamp"),
            ("level", "level"),
            ("message", "message"),
            ("pod", "hostname"),
            ("service", "service"),
        ]),
        Some(values(&[
            ("ERROR", &["error", "ERROR"]),
            ("WARNING", &["warn", "WARNING"]),
            ("INFO", &["info", "INFO"]),
            ("DEBUG", &["debug", "DEBUG"]),
        ])),
    );
    dev_app.default_size = 50;
    dev_app.timeout_ms = 10_000;
    let development = BTreeMap::from([("app_logs".to_string(), dev_app)]);

    BTreeMap::from([
        ("default".to_string(), production_like()),
        ("production".to_string(), production),
        ("staging".to_string(), staging),
        ("development".to_string(), development),
    ])
}
