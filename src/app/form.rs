//! Modal forms - field values, focus and cursor handling

use crate::error::LedgerError;
use crate::models::{self, Certificate, CertificateKind, LandParcel, OwnershipTransfer};

/// How a field takes input
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    /// Cycled with left/right instead of typed
    CertificateKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FormField {
    fn text(label: &'static str, placeholder: &'static str) -> Self {
        FormField {
            label,
            placeholder,
            value: String::new(),
            required: true,
            kind: FieldKind::Text,
        }
    }

    fn prefilled(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    fn certificate_kind(label: &'static str) -> Self {
        FormField {
            label,
            placeholder: "",
            value: CertificateKind::default().as_str().to_string(),
            required: true,
            kind: FieldKind::CertificateKind,
        }
    }
}

/// Ordered fields with one focused field and a byte cursor into it
#[derive(Clone, Debug, PartialEq)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub active: usize,
    pub cursor: usize,
    /// A contract call for this form is in flight
    pub loading: bool,
}

impl Form {
    fn new(fields: Vec<FormField>) -> Self {
        let cursor = fields.first().map(|f| f.value.len()).unwrap_or(0);
        Form {
            fields,
            active: 0,
            cursor,
            loading: false,
        }
    }

    pub fn register() -> Self {
        Form::new(vec![
            FormField::text("Parcel ID", "e.g. TNH-001"),
            FormField::text("Owner Name", "Full name of the owner"),
            FormField::text("Area", "e.g. 500 m²"),
            FormField::text("Location", "Full address of the parcel"),
        ])
    }

    pub fn certificate() -> Self {
        Form::new(vec![
            FormField::text("Certificate Number", "e.g. SHM-123456789"),
            FormField::text("Issue Date", "YYYY-MM-DD").prefilled(models::today()),
            FormField::text("Validity", "e.g. 30 years"),
            FormField::certificate_kind("Certificate Type"),
        ])
    }

    pub fn transfer() -> Self {
        Form::new(vec![
            FormField::text("New Owner Name", "Full name of the new owner"),
            FormField::text("New Owner Address", "Full address of the new owner"),
            FormField::text("Transfer Date", "YYYY-MM-DD").prefilled(models::today()),
            FormField::text("Reason", "Why ownership is being transferred"),
        ])
    }

    pub fn active_field(&self) -> Option<&FormField> {
        self.fields.get(self.active)
    }

    fn active_value_mut(&mut self) -> Option<&mut String> {
        match self.fields.get_mut(self.active) {
            Some(field) if field.kind == FieldKind::Text => Some(&mut field.value),
            _ => None,
        }
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.trim()).unwrap_or("")
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
            self.cursor = self.fields[self.active].value.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = self.active.checked_sub(1).unwrap_or(self.fields.len() - 1);
            self.cursor = self.fields[self.active].value.len();
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor = self.cursor;
        if let Some(value) = self.active_value_mut() {
            if cursor <= value.len() {
                value.insert(cursor, c);
                self.cursor = cursor + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        let cursor = self.cursor;
        if cursor == 0 {
            return;
        }
        if let Some(value) = self.active_value_mut() {
            let prev = value[..cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            value.remove(prev);
            self.cursor = prev;
        }
    }

    /// Left: moves the cursor, or cycles a choice backwards
    pub fn cursor_left(&mut self) {
        let Some(field) = self.fields.get_mut(self.active) else {
            return;
        };
        match field.kind {
            FieldKind::Text => {
                if self.cursor > 0 {
                    self.cursor = field.value[..self.cursor]
                        .char_indices()
                        .last()
                        .map(|(i, _)| i)
                        .unwrap_or(0);
                }
            }
            FieldKind::CertificateKind => {
                let kind = CertificateKind::from_label(&field.value).unwrap_or_default();
                field.value = kind.prev().as_str().to_string();
            }
        }
    }

    /// Right: moves the cursor, or cycles a choice forwards
    pub fn cursor_right(&mut self) {
        let Some(field) = self.fields.get_mut(self.active) else {
            return;
        };
        match field.kind {
            FieldKind::Text => {
                if self.cursor < field.value.len() {
                    self.cursor = field.value[self.cursor..]
                        .char_indices()
                        .nth(1)
                        .map(|(i, _)| self.cursor + i)
                        .unwrap_or(field.value.len());
                }
            }
            FieldKind::CertificateKind => {
                let kind = CertificateKind::from_label(&field.value).unwrap_or_default();
                field.value = kind.next().as_str().to_string();
            }
        }
    }

    /// First required field left blank
    pub fn check_required(&self) -> Result<(), LedgerError> {
        match self
            .fields
            .iter()
            .find(|f| f.required && f.value.trim().is_empty())
        {
            Some(field) => Err(LedgerError::MissingField(field.label)),
            None => Ok(()),
        }
    }

    pub fn to_parcel(&self) -> Result<LandParcel, LedgerError> {
        self.check_required()?;
        Ok(LandParcel::new(
            self.value(0),
            self.value(1),
            self.value(2),
            self.value(3),
        ))
    }

    pub fn to_certificate(&self) -> Result<Certificate, LedgerError> {
        self.check_required()?;
        Ok(Certificate {
            number: self.value(0).to_string(),
            issued_on: self.value(1).to_string(),
            validity: self.value(2).to_string(),
            kind: CertificateKind::from_label(self.value(3)).unwrap_or_default(),
        })
    }

    pub fn to_transfer(&self) -> Result<OwnershipTransfer, LedgerError> {
        self.check_required()?;
        Ok(OwnershipTransfer {
            new_owner: self.value(0).to_string(),
            new_owner_address: self.value(1).to_string(),
            transfer_date: self.value(2).to_string(),
            reason: self.value(3).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            form.enter_char(c);
        }
    }

    #[test]
    fn test_register_form_builds_parcel() {
        let mut form = Form::register();
        type_str(&mut form, "TNH-010");
        form.next_field();
        type_str(&mut form, "Dewi Lestari");
        form.next_field();
        type_str(&mut form, "320 m²");
        form.next_field();
        type_str(&mut form, "  Jl. Braga 5, Bandung ");

        let parcel = form.to_parcel().unwrap();
        assert_eq!(parcel.id, "TNH-010");
        assert_eq!(parcel.area, "320 m²");
        assert_eq!(parcel.location, "Jl. Braga 5, Bandung");
        assert!(!parcel.verified);
        assert!(parcel.certificate_number.is_none());
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let mut form = Form::register();
        type_str(&mut form, "TNH-010");
        assert_eq!(
            form.to_parcel(),
            Err(LedgerError::MissingField("Owner Name"))
        );
    }

    #[test]
    fn test_transfer_reason_is_required() {
        let mut form = Form::transfer();
        type_str(&mut form, "Rina");
        form.next_field();
        type_str(&mut form, "Jl. Asia Afrika 1");
        assert_eq!(form.to_transfer(), Err(LedgerError::MissingField("Reason")));

        form.next_field();
        form.next_field();
        type_str(&mut form, "Inheritance");
        let transfer = form.to_transfer().unwrap();
        assert_eq!(transfer.reason, "Inheritance");
        assert_eq!(transfer.transfer_date, models::today());
    }

    #[test]
    fn test_cursor_edits_multibyte_text() {
        let mut form = Form::register();
        type_str(&mut form, "5m²");
        form.cursor_left();
        form.cursor_left();
        form.enter_char('0');
        assert_eq!(form.fields[0].value, "50m²");
        form.cursor_right();
        form.cursor_right();
        form.delete_char();
        assert_eq!(form.fields[0].value, "50m");
        assert_eq!(form.cursor, 3);
    }

    #[test]
    fn test_certificate_kind_field_cycles() {
        let mut form = Form::certificate();
        form.prev_field();
        assert_eq!(form.active_field().unwrap().kind, FieldKind::CertificateKind);
        form.enter_char('x');
        form.cursor_right();
        assert_eq!(form.fields[3].value, "SHGB");
        form.cursor_left();
        form.cursor_left();
        assert_eq!(form.fields[3].value, "SHU");
    }
}
