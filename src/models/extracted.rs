use serde::{Deserialize, Serialize};

use super::enums::Severity;

/// A per-document discrepancy reported by the extraction collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub severity: Severity,
    pub description: String,
}

/// All fields extracted from a single document.
///
/// Every field is optional: the extraction collaborator may omit anything,
/// and an absent field means "no opinion", never a mismatch. Dates are
/// canonical `YYYY-MM-DD` strings once the document result is assembled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedData {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub beneficiary: Option<String>,
    pub applicant: Option<String>,
    pub port_of_loading: Option<String>,
    pub port_of_discharge: Option<String>,
    pub goods_description: Option<String>,
    pub quantity: Option<String>,
    pub weight: Option<String>,
    pub shipment_date: Option<String>,
    pub document_date: Option<String>,
    pub vessel_name: Option<String>,
    pub document_number: Option<String>,
    pub lc_number: Option<String>,

    pub lc: Option<LcTerms>,
    pub transport: Option<TransportDetails>,
    pub invoice_lines: Option<InvoiceLines>,
    pub packing: Option<PackingDetails>,
    pub ullage: Option<UllageDetails>,
    pub insurance: Option<InsuranceDetails>,
    pub certificate: Option<CertificateDetails>,
    pub loi: Option<LoiDetails>,
    pub outturn: Option<OutturnDetails>,
    pub export_license: Option<ExportLicenseDetails>,
    pub ownership: Option<OwnershipDetails>,
    pub tank_inspection: Option<TankInspectionDetails>,
}

/// Letter-of-credit terms the cross-reference rules compare against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LcTerms {
    pub expiry_date: Option<String>,
    pub latest_shipment_date: Option<String>,
    /// Free-text tolerance clause, e.g. "+/- 5%" or "5 PCT MORE OR LESS".
    pub tolerance: Option<String>,
    pub issuing_bank: Option<String>,
    pub required_inspection_company: Option<String>,
    pub freight_terms: Option<String>,
}

/// Bill-of-lading transport particulars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportDetails {
    pub consignee: Option<String>,
    pub notify_party: Option<String>,
    pub carrier_name: Option<String>,
    pub carrier_signed: Option<bool>,
    pub shipped_on_board: Option<bool>,
    /// "prepaid" or "collect" as printed on the B/L.
    pub freight_notation: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceLines {
    pub items: Vec<InvoiceLineItem>,
    pub printed_total: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub line_total: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackingDetails {
    pub rows: Vec<PackingListRow>,
    pub printed_total_net_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingListRow {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub net_weight_kg: Option<f64>,
    pub gross_weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UllageDetails {
    pub tanks: Vec<UllageTankRow>,
    pub printed_total_volume: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UllageTankRow {
    pub tank_id: Option<String>,
    pub volume: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsuranceDetails {
    pub insured_amount: Option<String>,
    pub currency: Option<String>,
    pub risks_covered: Option<String>,
}

/// Issuer and dating for origin/quality/inspection certificates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateDetails {
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
    pub inspection_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoiDetails {
    pub vessel_name: Option<String>,
    pub bl_number: Option<String>,
    pub invoice_number: Option<String>,
}

/// Weight out-turn report figures at discharge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutturnDetails {
    pub bl_quantity: Option<String>,
    pub outturn_quantity: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportLicenseDetails {
    pub exporter: Option<String>,
    pub license_number: Option<String>,
    pub expiry_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnershipDetails {
    pub buyer: Option<String>,
    pub vessel_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TankInspectionDetails {
    pub vessel_name: Option<String>,
    pub inspection_date: Option<String>,
    pub result: Option<String>,
}
