use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    ApprovalStatus, ContactMessage, ContactRequest, DocumentAccessRequest, DocumentRequest, GpRecord,
    InvestorMessage, LpRecord, NewGp, NewLp, PipelineStage,
};
use crate::services::store::{RecordStore, StoreError};

/// Process-local store for tests and running without a database
///
/// Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    gps: RwLock<Vec<GpRecord>>,
    lps: RwLock<Vec<LpRecord>>,
    contacts: RwLock<Vec<ContactMessage>>,
    document_requests: RwLock<Vec<DocumentRequest>>,
    messages: RwLock<Vec<InvestorMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_gp(&self, gp: NewGp) -> Result<GpRecord, StoreError> {
        let record = GpRecord {
            id: Uuid::new_v4(),
            name: gp.name,
            email: gp.email,
            firm: gp.firm,
            aum_bracket: gp.aum_bracket,
            strategies: gp.strategies,
            fund_in_market: gp.fund_in_market,
            approval: ApprovalStatus::Pending,
            created_at: Some(Utc::now()),
        };
        self.gps.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_gps(&self) -> Result<Vec<GpRecord>, StoreError> {
        Ok(self.gps.read().await.iter().rev().cloned().collect())
    }

    async fn update_gp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<GpRecord, StoreError> {
        let mut gps = self.gps.write().await;
        let gp = gps
            .iter_mut()
            .find(|gp| gp.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("GP {}", id)))?;
        gp.approval = approval;
        Ok(gp.clone())
    }

    async fn delete_gp(&self, id: Uuid) -> Result<(), StoreError> {
        let mut gps = self.gps.write().await;
        let before = gps.len();
        gps.retain(|gp| gp.id != id);
        if gps.len() == before {
            return Err(StoreError::NotFound(format!("GP {}", id)));
        }
        Ok(())
    }

    async fn insert_lp(&self, lp: NewLp) -> Result<LpRecord, StoreError> {
        let record = LpRecord {
            id: Uuid::new_v4(),
            name: lp.name,
            email: lp.email,
            organization: lp.organization,
            investor_type: lp.investor_type,
            interests: lp.interests,
            jurisdiction: lp.jurisdiction,
            stage: PipelineStage::ToContact,
            approval: ApprovalStatus::Pending,
            created_at: Some(Utc::now()),
        };
        self.lps.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_lps(&self) -> Result<Vec<LpRecord>, StoreError> {
        Ok(self.lps.read().await.iter().rev().cloned().collect())
    }

    async fn get_lp(&self, id: Uuid) -> Result<LpRecord, StoreError> {
        self.lps
            .read()
            .await
            .iter()
            .find(|lp| lp.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("LP {}", id)))
    }

    async fn update_lp_stage(&self, id: Uuid, stage: PipelineStage) -> Result<(), StoreError> {
        let mut lps = self.lps.write().await;
        let lp = lps
            .iter_mut()
            .find(|lp| lp.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("LP {}", id)))?;
        lp.stage = stage;
        Ok(())
    }

    async fn update_lp_approval(&self, id: Uuid, approval: ApprovalStatus) -> Result<(), StoreError> {
        let mut lps = self.lps.write().await;
        let lp = lps
            .iter_mut()
            .find(|lp| lp.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("LP {}", id)))?;
        lp.approval = approval;
        Ok(())
    }

    async fn delete_lp(&self, id: Uuid) -> Result<(), StoreError> {
        let mut lps = self.lps.write().await;
        let before = lps.len();
        lps.retain(|lp| lp.id != id);
        if lps.len() == before {
            return Err(StoreError::NotFound(format!("LP {}", id)));
        }
        Ok(())
    }

    async fn insert_contact(&self, contact: ContactRequest) -> Result<ContactMessage, StoreError> {
        let record = ContactMessage {
            id: Uuid::new_v4(),
            name: contact.name,
            email: contact.email,
            company: contact.company,
            message: contact.message,
            created_at: Some(Utc::now()),
        };
        self.contacts.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_contacts(&self) -> Result<Vec<ContactMessage>, StoreError> {
        Ok(self.contacts.read().await.iter().rev().cloned().collect())
    }

    async fn insert_document_request(&self, request: DocumentAccessRequest) -> Result<DocumentRequest, StoreError> {
        let record = DocumentRequest {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            company: request.company,
            document: request.document,
            created_at: Some(Utc::now()),
        };
        self.document_requests.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_document_requests(&self) -> Result<Vec<DocumentRequest>, StoreError> {
        Ok(self.document_requests.read().await.iter().rev().cloned().collect())
    }

    async fn insert_message(&self, lp_id: Uuid, author_id: &str, body: &str) -> Result<InvestorMessage, StoreError> {
        let message = InvestorMessage {
            id: Uuid::new_v4(),
            lp_id,
            author_id: author_id.to_string(),
            body: body.to_string(),
            created_at: Some(Utc::now()),
        };
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, lp_id: Uuid) -> Result<Vec<InvestorMessage>, StoreError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.lp_id == lp_id)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
