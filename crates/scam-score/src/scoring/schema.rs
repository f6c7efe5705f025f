//! Column names the engine reads. Lookups ignore ASCII case on trimmed names.

pub const WAS_CANCELED: &str = "was_canceled";
pub const NEGATIVE_STATUS: &str = "NEGATIVESTATUS";
pub const OVERDUE_INSTALMENT_COUNT: &str = "overdueinstalmentcount_po_subektu";
pub const OVERDUE_PEAKS_LAST_2Y: &str = "SUM_SIG_PEAKS_OVERDUECOUNT_LAST_2Y";
pub const NUM_CONTRACTS: &str = "NUM_CONTRACTS";
pub const MONTH_OVERDUE_FRAGMENT: &str = "MONTH_OVERDUE_C";
pub const NUM_CONTRACT_PDL: &str = "NUM_CONTRACT_PDL";
pub const NUM_CONTRACT_OTHER: &str = "NUM_CONTRACT_OTHER";
pub const NUM_CONTRACTS_STARTED_6M: &str = "NUM_CONTRACTS_STARTED_6M";
pub const OVERDUE_AMOUNT: &str = "overdueamount";
pub const INSTALMENT_AMOUNT: &str = "instalmentamount";
pub const CLASSIFICATION: &str = "CLASSIFICATION";
pub const DTI_3M: &str = "DTI3M";
pub const NUM_PHONE_NUMBERS: &str = "NUM_PHONENUMBERS";
pub const NUM_ADDRESSES: &str = "NUM_ADDRESSES";
pub const AVG_BALANCE_3M: &str = "AVG_BALANCE_3M";
pub const GENDER: &str = "GENDER";

pub const GENDER_CODE_MALE: f64 = 1.0;
pub const GENDER_CODE_FEMALE: f64 = 2.0;

pub const NEGATIVE_STATUS_MARKER: &str = "y";
pub const SUBPRIME_CLASSES: [&str; 2] = ["e", "f"];

pub const IDENTIFIER_COLUMNS: [&str; 3] = ["ID", "CONTRACT_ID", "CLIENT_ID"];

/// Columns read as quantities, along with every `MONTH_OVERDUE_C*` column. Text that
/// fails to clean in these is the not-a-number sentinel rather than a label.
pub const NUMERIC_COLUMNS: [&str; 13] = [
    WAS_CANCELED,
    OVERDUE_INSTALMENT_COUNT,
    OVERDUE_PEAKS_LAST_2Y,
    NUM_CONTRACTS,
    NUM_CONTRACT_PDL,
    NUM_CONTRACT_OTHER,
    NUM_CONTRACTS_STARTED_6M,
    OVERDUE_AMOUNT,
    INSTALMENT_AMOUNT,
    DTI_3M,
    NUM_PHONE_NUMBERS,
    NUM_ADDRESSES,
    AVG_BALANCE_3M,
];

pub fn is_identifier(name: &str) -> bool {
    let trimmed = name.trim();
    IDENTIFIER_COLUMNS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(trimmed))
}

pub fn is_numeric(name: &str) -> bool {
    let trimmed = name.trim();
    let upper = trimmed.to_ascii_uppercase();
    upper.contains(MONTH_OVERDUE_FRAGMENT)
        || NUMERIC_COLUMNS
            .iter()
            .any(|candidate| candidate.eq_ignore_ascii_case(trimmed))
}
