//! The built-in Udyam registration schema.

use crate::field::{FieldDescriptor, FieldKind, FieldOption, InputFormat, ValidationRules};
use crate::schema::{FormSchema, StepDescriptor};

/// Field names the workflow maps onto service requests.
pub mod names {
  pub const AADHAAR_NUMBER: &str = "aadhaarNumber";
  pub const ENTREPRENEUR_NAME: &str = "entrepreneurName";
  pub const AADHAAR_CONSENT: &str = "consent";
  pub const TYPE_OF_ORGANISATION: &str = "typeOfOrganisation";
  pub const PAN_NUMBER: &str = "panNumber";
  pub const PAN_HOLDER_NAME: &str = "panHolderName";
  pub const DOB_OR_DOI: &str = "dobOrDoi";
  pub const PAN_CONSENT: &str = "panConsent";
  pub const PREVIOUS_YEAR_ITR: &str = "previousYearITR";
  pub const HAS_GSTIN: &str = "hasGSTIN";
}

const AADHAAR_CONSENT_LABEL: &str = "I, the holder of the above Aadhaar, hereby give my consent to \
  Ministry of MSME, Government of India, for using my Aadhaar number as alloted by UIDAI for Udyam \
  Registration. NIC / Ministry of MSME, Government of India, have informed me that my aadhaar data \
  will not be stored/shared. / मैं, आधार धारक, इस प्रकार उद्यम पंजीकरण के लिए यूआईडीएआई के साथ अपने \
  आधार संख्या का उपयोग करने के लिए सू0ल0म0उ0 मंत्रालय, भारत सरकार को अपनी सहमति देता हूं। एनआईसी / \
  सू0ल0म0उ0 मंत्रालय, भारत सरकार ने मुझे सूचित किया है कि मेरा आधार डेटा संग्रहीत / साझा नहीं किया जाएगा।";

const PAN_CONSENT_LABEL: &str = "I, the holder of the above PAN, hereby give my consent to Ministry \
  of MSME, Government of India, for using my data/ information available in the Income Tax Returns \
  filed by me, and also the same available in the GST Returns and also from other Government \
  organizations, for MSME classification and other official purposes, in pursuance of the MSMED \
  Act, 2006.";

fn required() -> ValidationRules {
  ValidationRules {
    required: true,
    ..Default::default()
  }
}

fn organisation_types() -> Vec<FieldOption> {
  // Values are the registry codes, not positions: LLP is "9", Others is "8".
  vec![
    FieldOption::new("1. Proprietary / एकल स्वामित्व", "1"),
    FieldOption::new("2. Hindu Undivided Family / हिंदू अविभाजित परिवार (एचयूएफ)", "2"),
    FieldOption::new("3. Partnership / पार्टनरशिप", "3"),
    FieldOption::new("4. Co-Operative / सहकारी", "4"),
    FieldOption::new("5. Private Limited Company / प्राइवेट लिमिटेड कंपनी", "5"),
    FieldOption::new("6. Public Limited Company / पब्लिक लिमिटेड कंपनी", "6"),
    FieldOption::new("7. Self Help Group / स्वयं सहायता समूह", "7"),
    FieldOption::new("8. Limited Liability Partnership / सीमित दायित्व भागीदारी", "9"),
    FieldOption::new("9. Society / सोसाईटी", "10"),
    FieldOption::new("10. Trust / ट्रस्ट", "11"),
    FieldOption::new("11. Others / अन्य", "8"),
  ]
}

fn aadhaar_step() -> StepDescriptor {
  StepDescriptor {
    step: 1,
    name: "Aadhaar & OTP Verification".to_string(),
    fields: vec![
      FieldDescriptor::new(
        names::AADHAAR_NUMBER,
        "1. Aadhaar Number / आधार संख्या",
        FieldKind::Text,
      )
      .with_placeholder("Your Aadhaar No")
      .with_validation(ValidationRules {
        required: true,
        maxlength: Some(12),
        pattern: Some(r"^\d{12}$".to_string()),
        checked: false,
      }),
      FieldDescriptor::new(
        names::ENTREPRENEUR_NAME,
        "2. Name of Entrepreneur / उद्यमी का नाम",
        FieldKind::Text,
      )
      .with_placeholder("Name as per Aadhaar")
      .with_validation(ValidationRules {
        maxlength: Some(100),
        ..required()
      }),
      FieldDescriptor::new(names::AADHAAR_CONSENT, AADHAAR_CONSENT_LABEL, FieldKind::Checkbox)
        .with_validation(ValidationRules {
          checked: true,
          ..required()
        }),
    ],
  }
}

fn pan_step() -> StepDescriptor {
  StepDescriptor {
    step: 2,
    name: "PAN Verification".to_string(),
    fields: vec![
      FieldDescriptor::new(
        names::TYPE_OF_ORGANISATION,
        "3. Type of Organisation / संगठन के प्रकार",
        FieldKind::Select {
          options: organisation_types(),
        },
      )
      .with_validation(required())
      .with_default("1"),
      FieldDescriptor::new(names::PAN_NUMBER, "4.1 PAN / पैन", FieldKind::Text)
        .with_placeholder("Enter Pan Number")
        .with_validation(ValidationRules {
          required: true,
          maxlength: Some(10),
          pattern: Some("^[A-Z]{5}[0-9]{4}[A-Z]{1}$".to_string()),
          checked: false,
        })
        .with_format(InputFormat::DocumentNumber),
      FieldDescriptor::new(
        names::PAN_HOLDER_NAME,
        "4.1.1 Name of PAN Holder / पैन धारक का नाम",
        FieldKind::Text,
      )
      .with_placeholder("Name as per PAN")
      .with_validation(ValidationRules {
        maxlength: Some(100),
        ..required()
      }),
      FieldDescriptor::new(
        names::DOB_OR_DOI,
        "4.1.2 DOB or DOI as per PAN / पैन के अनुसार जन्म तिथि या निगमन तिथि",
        FieldKind::Text,
      )
      .with_placeholder("DD/MM/YYYY")
      .with_validation(ValidationRules {
        pattern: Some(r"^(0[1-9]|[12][0-9]|3[01])/(0[1-9]|1[0-2])/\d{4}$".to_string()),
        ..required()
      })
      .with_format(InputFormat::Date),
      FieldDescriptor::new(names::PAN_CONSENT, PAN_CONSENT_LABEL, FieldKind::Checkbox)
        .with_validation(ValidationRules {
          checked: true,
          ..Default::default()
        }),
      FieldDescriptor::new(
        names::PREVIOUS_YEAR_ITR,
        "Have you filed the ITR for Previous Year(PY) (2023-24) ITR ?",
        FieldKind::Radio {
          options: vec![FieldOption::new("Yes", "1"), FieldOption::new("No", "2")],
        },
      )
      .conditional(),
      FieldDescriptor::new(
        names::HAS_GSTIN,
        "4.3 Do you have GSTIN ?",
        FieldKind::Radio {
          options: vec![
            FieldOption::new("Yes", "1"),
            FieldOption::new("No", "2"),
            FieldOption::new("Exempted / छूट प्राप्त", "3"),
          ],
        },
      )
      .conditional(),
    ],
  }
}

impl FormSchema {
  /// The Udyam registration form: Aadhaar + OTP, then PAN.
  pub fn udyam() -> Self {
    Self {
      steps: vec![aadhaar_step(), pan_step()],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_udyam_schema_shape() {
    let schema = FormSchema::udyam();
    assert_eq!(schema.steps.len(), 2);

    let aadhaar = schema.step_at(0).unwrap();
    assert_eq!(aadhaar.fields.len(), 3);
    assert!(aadhaar.field(names::AADHAAR_CONSENT).unwrap().is_checkbox());

    let pan = schema.step_at(1).unwrap();
    let conditional: Vec<&str> = pan
      .fields
      .iter()
      .filter(|f| f.conditional)
      .map(|f| f.name.as_str())
      .collect();
    assert_eq!(conditional, vec![names::PREVIOUS_YEAR_ITR, names::HAS_GSTIN]);
  }

  #[test]
  fn test_formatted_fields() {
    let schema = FormSchema::udyam();
    let pan = schema.step_at(1).unwrap();

    assert_eq!(
      pan.field(names::PAN_NUMBER).unwrap().format,
      Some(InputFormat::DocumentNumber)
    );
    assert_eq!(pan.field(names::DOB_OR_DOI).unwrap().format, Some(InputFormat::Date));
    assert_eq!(pan.field(names::PAN_HOLDER_NAME).unwrap().format, None);
  }

  #[test]
  fn test_organisation_type_defaults_to_proprietary() {
    let schema = FormSchema::udyam();
    let org = schema.step_at(1).unwrap().field(names::TYPE_OF_ORGANISATION).unwrap();

    assert_eq!(org.default.as_deref(), Some("1"));
    assert_eq!(org.kind.options().len(), 11);
  }

  #[test]
  fn test_consent_labels() {
    let schema = FormSchema::udyam();
    let aadhaar = schema.step_at(0).unwrap().field(names::AADHAAR_CONSENT).unwrap();

    assert!(aadhaar.label.starts_with("I, the holder of the above Aadhaar"));
    assert!(aadhaar.label.contains("will not be stored/shared. / मैं, आधार धारक,"));
    assert!(aadhaar.label.ends_with("संग्रहीत / साझा नहीं किया जाएगा।"));
    assert!(!aadhaar.label.contains("  "));
  }
}
