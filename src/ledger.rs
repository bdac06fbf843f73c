use std::collections::VecDeque;

use crate::constants::MAX_ACTIVITY;
use crate::error::LedgerError;
use crate::models::{ActivityEntry, Certificate, LandParcel, OwnershipTransfer, Stats};

/// In-memory parcel list and activity log for the current session
#[derive(Debug, Default)]
pub struct Ledger {
    parcels: Vec<LandParcel>,
    activity: VecDeque<ActivityEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            parcels: Vec::new(),
            activity: VecDeque::with_capacity(MAX_ACTIVITY),
        }
    }

    pub fn parcels(&self) -> &[LandParcel] {
        &self.parcels
    }

    pub fn len(&self) -> usize {
        self.parcels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parcels.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&LandParcel> {
        self.parcels.iter().find(|p| p.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&LandParcel> {
        self.parcels.get(index)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut LandParcel, LedgerError> {
        self.parcels
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LedgerError::UnknownParcel(id.to_string()))
    }

    /// Replace the whole list (used when a wallet connects)
    pub fn load(&mut self, parcels: Vec<LandParcel>) {
        self.parcels = parcels;
    }

    /// Drop all parcels and activity
    pub fn clear(&mut self) {
        self.parcels.clear();
        self.activity.clear();
    }

    /// Fails if a parcel with the same id exists
    pub fn check_new_id(&self, id: &str) -> Result<(), LedgerError> {
        if self.get(id).is_some() {
            Err(LedgerError::DuplicateId(id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn check_exists(&self, id: &str) -> Result<(), LedgerError> {
        self.get(id)
            .map(|_| ())
            .ok_or_else(|| LedgerError::UnknownParcel(id.to_string()))
    }

    pub fn check_verifiable(&self, id: &str) -> Result<(), LedgerError> {
        match self.get(id) {
            Some(p) if p.verified => Err(LedgerError::AlreadyVerified(id.to_string())),
            Some(_) => Ok(()),
            None => Err(LedgerError::UnknownParcel(id.to_string())),
        }
    }

    pub fn register(&mut self, parcel: LandParcel) -> Result<(), LedgerError> {
        self.check_new_id(&parcel.id)?;
        self.parcels.push(parcel);
        Ok(())
    }

    pub fn issue_certificate(
        &mut self,
        id: &str,
        certificate: &Certificate,
    ) -> Result<(), LedgerError> {
        let parcel = self.get_mut(id)?;
        parcel.certificate_number = Some(certificate.number.clone());
        Ok(())
    }

    pub fn transfer(&mut self, id: &str, transfer: &OwnershipTransfer) -> Result<(), LedgerError> {
        let parcel = self.get_mut(id)?;
        parcel.owner = transfer.new_owner.clone();
        Ok(())
    }

    pub fn verify(&mut self, id: &str) -> Result<(), LedgerError> {
        let parcel = self.get_mut(id)?;
        parcel.verified = true;
        Ok(())
    }

    pub fn stats(&self) -> Stats {
        Stats::from_parcels(&self.parcels)
    }

    /// Add entry to the activity log
    pub fn record(&mut self, parcel_id: Option<String>, message: impl Into<String>) {
        if self.activity.len() >= MAX_ACTIVITY {
            self.activity.pop_back();
        }
        self.activity.push_front(ActivityEntry {
            parcel_id,
            message: message.into(),
            timestamp: chrono::Utc::now(),
        });
    }

    pub fn activity(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.activity.iter()
    }

    /// Activity concerning one parcel, newest first
    pub fn history_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ActivityEntry> {
        self.activity
            .iter()
            .filter(move |e| e.parcel_id.as_deref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{mock_parcels, CertificateKind};

    fn seeded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.load(mock_parcels());
        ledger
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut ledger = seeded();
        let dup = LandParcel::new("TNH-001", "Someone", "10 m²", "Nowhere");
        assert_eq!(
            ledger.register(dup),
            Err(LedgerError::DuplicateId("TNH-001".into()))
        );
        assert_eq!(ledger.len(), 3);

        ledger
            .register(LandParcel::new("TNH-004", "Dewi", "90 m²", "Bandung"))
            .unwrap();
        assert_eq!(ledger.len(), 4);
        assert!(!ledger.get("TNH-004").unwrap().verified);
    }

    #[test]
    fn test_certificate_and_transfer_mutate_in_place() {
        let mut ledger = seeded();
        let cert = Certificate {
            number: "SHM-000777".into(),
            issued_on: "2026-01-01".into(),
            validity: "30 years".into(),
            kind: CertificateKind::SHM,
        };
        ledger.issue_certificate("TNH-002", &cert).unwrap();
        assert_eq!(
            ledger.get("TNH-002").unwrap().certificate_number.as_deref(),
            Some("SHM-000777")
        );

        let transfer = OwnershipTransfer {
            new_owner: "Rina".into(),
            new_owner_address: "Jl. Asia Afrika 1".into(),
            transfer_date: "2026-02-02".into(),
            reason: "Sale".into(),
        };
        ledger.transfer("TNH-002", &transfer).unwrap();
        assert_eq!(ledger.get("TNH-002").unwrap().owner, "Rina");

        assert_eq!(
            ledger.transfer("TNH-999", &transfer),
            Err(LedgerError::UnknownParcel("TNH-999".into()))
        );
    }

    #[test]
    fn test_verify_flow() {
        let mut ledger = seeded();
        assert_eq!(
            ledger.check_verifiable("TNH-001"),
            Err(LedgerError::AlreadyVerified("TNH-001".into()))
        );
        ledger.check_verifiable("TNH-002").unwrap();
        ledger.verify("TNH-002").unwrap();
        assert_eq!(ledger.stats().pending, 0);
    }

    #[test]
    fn test_activity_is_bounded_and_newest_first() {
        let mut ledger = seeded();
        for i in 0..(MAX_ACTIVITY + 5) {
            ledger.record(Some("TNH-001".into()), format!("event {}", i));
        }
        ledger.record(Some("TNH-002".into()), "other parcel");

        assert_eq!(ledger.activity().count(), MAX_ACTIVITY);
        assert_eq!(ledger.activity().next().unwrap().message, "other parcel");
        assert_eq!(ledger.history_for("TNH-002").count(), 1);
        assert_eq!(
            ledger.history_for("TNH-001").next().unwrap().message,
            format!("event {}", MAX_ACTIVITY + 4)
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut ledger = seeded();
        ledger.record(None, "connected");
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.activity().count(), 0);
    }
}
