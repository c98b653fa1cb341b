//! Assembling RS0001 documents from chiller models.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::document::{
    DATA_MODEL, Description, Metadata, PerformanceSection, ProductInformation, Rs0001Document,
    SCHEMA, SCHEMA_VERSION,
};
use crate::error::{RepresentationError, RepresentationResult};
use crate::id::{document_id, seed_digest};
use cm_core::units::constants::TON_REF_W;
use cm_models::{
    BaselineChiller, ChillerModel, MapResolution, generate_performance,
};

/// Metadata inputs of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Defaults to a summary of the chiller rating
    pub description: Option<String>,
    pub notes: Option<String>,
    pub data_version: u32,
    pub data_source: Option<String>,
    /// Text hashed into the document id; random id when absent
    pub uuid_seed: Option<String>,
    pub compressor_type: Option<String>,
    /// Defaults to the current time
    pub timestamp: Option<DateTime<Utc>>,
    pub resolution: MapResolution,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            description: None,
            notes: None,
            data_version: 1,
            data_source: None,
            uuid_seed: None,
            compressor_type: None,
            timestamp: None,
            resolution: MapResolution::default(),
        }
    }
}

impl DocumentOptions {
    /// Options carrying the texts of a catalog baseline.
    pub fn for_baseline(baseline: &BaselineChiller) -> Self {
        Self {
            description: Some(baseline.metadata.description.clone()),
            notes: Some(baseline.metadata.notes.clone()),
            uuid_seed: Some(seed_digest(&baseline.metadata.uuid_seed)),
            compressor_type: baseline.metadata.compressor_type.map(str::to_string),
            ..Self::default()
        }
    }
}

/// `"{tons} ton, {cop} COP {condenser} chiller"`.
pub fn rating_description(chiller: &dyn ChillerModel) -> String {
    let design = chiller.design();
    format!(
        "{:.1} ton, {:.2} COP {} chiller",
        design.rated_net_evaporator_capacity().value / TON_REF_W,
        design.rated_cop(),
        chiller.condenser().condenser_type().text()
    )
}

/// RS0001 timestamp format, minute resolution in UTC.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%MZ").to_string()
}

/// Generate the performance section of `chiller` and wrap it in a document.
pub fn represent(
    chiller: &dyn ChillerModel,
    options: &DocumentOptions,
) -> RepresentationResult<Rs0001Document> {
    if options.data_version == 0 {
        return Err(RepresentationError::InvalidDocument {
            what: "data_version starts at 1".to_string(),
        });
    }
    let performance = generate_performance(chiller, &options.resolution)?;
    let id = document_id(options.uuid_seed.as_deref());

    let liquid_data_source = chiller
        .evaporator()
        .rated_state()
        .liquid_state()
        .map(|s| s.model().name().to_string());

    let document = Rs0001Document {
        metadata: Metadata {
            data_model: DATA_MODEL.to_string(),
            schema: SCHEMA.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            description: options
                .description
                .clone()
                .unwrap_or_else(|| rating_description(chiller)),
            id: id.to_string(),
            data_timestamp: format_timestamp(options.timestamp.unwrap_or_else(Utc::now)),
            data_version: options.data_version,
            data_source: options.data_source.clone(),
            notes: options.notes.clone(),
        },
        description: Description {
            product_information: ProductInformation {
                compressor_type: options.compressor_type.clone(),
                liquid_data_source,
                hot_gas_bypass_installed: chiller.design().staging().has_bypass_stage(),
            },
        },
        performance: PerformanceSection::from(&performance),
    };
    info!(
        id = %document.metadata.id,
        formulation = chiller.formulation_name(),
        "assembled RS0001 document"
    );
    Ok(document)
}
