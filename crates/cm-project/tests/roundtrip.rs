use cm_project::schema::*;
use cm_project::{load, load_json, load_yaml, resolve_chiller, save_json, save_yaml, validate_project};
use std::path::PathBuf;

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/plant.yaml")
}

fn baseline(id: &str) -> ChillerDef {
    ChillerDef {
        id: id.to_string(),
        name: "Baseline".to_string(),
        description: None,
        notes: Some("sized for the east wing".to_string()),
        data_version: 1,
        model: ChillerModelDef::Baseline(BaselineDef {
            path: CompliancePathDef::EcbB,
            condenser_type: CondenserTypeDef::LiquidCooled,
            compressor_type: CompressorTypeDef::PositiveDisplacement,
            rated_net_evaporator_capacity: QuantityDef::new(200.0, "ton_ref"),
            rated_cop: Some(5.2),
            cycling_degradation_coefficient: 0.1,
            standby_power: Some(QuantityDef::new(0.5, "kW")),
            losses: LossesDef::default(),
        }),
    }
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = ProjectDef {
        version: 1,
        name: "Empty Project".to_string(),
        chillers: vec![],
    };

    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("cm_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json_baseline_project() {
    let project = ProjectDef {
        version: 1,
        name: "Baselines".to_string(),
        chillers: vec![baseline("b1")],
    };

    let path = std::env::temp_dir().join("cm_project_roundtrip_baseline.json");
    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();
    assert_eq!(project, loaded);

    let resolved = resolve_chiller(&loaded.chillers[0]).unwrap();
    assert_eq!(resolved.notes.as_deref(), Some("sized for the east wing"));
    assert_eq!(resolved.compressor_type, Some("SCROLL"));
    assert_eq!(resolved.model.design().standby_power().value, 500.0);
}

#[test]
fn demo_project_loads_and_resolves() {
    let project = load(&demo_path()).unwrap();
    assert_eq!(project.chillers.len(), 2);

    let custom = resolve_chiller(project.chiller("ch-1").unwrap()).unwrap();
    assert_eq!(custom.model.formulation_name(), "reformulated EIR");
    assert_eq!(custom.model.design().staging().stages(), 5);

    let air = resolve_chiller(project.chiller("ch-2").unwrap()).unwrap();
    assert_eq!(air.data_version, 2);
    assert_eq!(air.model.condenser().condenser_type(), cm_models::CondenserType::Air);
    assert!(air.description.unwrap().contains("'A'"));

    assert!(project.chiller("ch-3").is_err());
}
