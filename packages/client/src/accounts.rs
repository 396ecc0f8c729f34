use jobboard_common::ReturnType;
use jobboard_common::document::{DocumentError, WriteMode, encode};
use jobboard_common::identity::AuthUser;
use jobboard_common::models::{
    AccountDocument, FileUpload, FirmAccount, FirmProfileUpdate, UserAccount, UserProfileUpdate,
    timestamp,
};
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::documents::DocumentClient;
use crate::error::ClientError;

impl DocumentClient {
    /// Look `uid` up in the user collection, then the firm collection.
    /// `None` when it is in neither or the lookup fails.
    #[instrument(skip(self))]
    pub async fn get_document_by_uid(&self, uid: &str) -> Option<AccountDocument> {
        match self.find_account(uid).await {
            Ok(found) => found,
            Err(e) => {
                error!(error = %e, "Error fetching account document");
                None
            }
        }
    }

    async fn find_account(&self, uid: &str) -> Result<Option<AccountDocument>, DocumentError> {
        if let Some(doc) = self.store.get(&self.collections.users, uid).await? {
            return Ok(Some(AccountDocument::User(doc.decode()?)));
        }
        if let Some(doc) = self.store.get(&self.collections.firms, uid).await? {
            return Ok(Some(AccountDocument::Firm(doc.decode()?)));
        }
        Ok(None)
    }

    /// Write a minimal user profile, replacing any existing one.
    #[instrument(skip(self, profile_pic))]
    pub async fn set_user_document(
        &self,
        uid: &str,
        email: &str,
        name: &str,
        profile_pic: &str,
    ) -> Result<(), ClientError> {
        let account = UserAccount {
            uid: uid.to_string(),
            email: email.to_string(),
            name: self.name_or_default(name),
            telephone: String::new(),
            profile_pic: profile_pic.to_string(),
            is_firm: false,
            created_at: timestamp::now(),
        };
        self.put_user_account(&account).await.inspect_err(|e| {
            error!(error = %e, "Error setting user document");
        })
    }

    /// Return the account of a signed-in identity, creating a user profile
    /// from the identity's details when none exists yet.
    #[instrument(skip(self, user), fields(uid = %user.uid))]
    pub async fn ensure_user_document(&self, user: &AuthUser) -> Result<AccountDocument, ClientError> {
        if let Some(account) = self.find_account(&user.uid).await? {
            return Ok(account);
        }
        self.set_user_document(
            &user.uid,
            &user.email,
            user.display_name.as_deref().unwrap_or_default(),
            user.photo_url.as_deref().unwrap_or_default(),
        )
        .await?;
        info!("Created profile for new federated account");
        self.find_account(&user.uid)
            .await?
            .ok_or_else(|| ClientError::InvalidInput(format!("profile of {} vanished", user.uid)))
    }

    pub async fn put_user_account(&self, account: &UserAccount) -> Result<(), ClientError> {
        self.store
            .set(&self.collections.users, &account.uid, encode(account)?, WriteMode::Overwrite)
            .await?;
        Ok(())
    }

    pub async fn put_firm_account(&self, account: &FirmAccount) -> Result<(), ClientError> {
        self.store
            .set(&self.collections.firms, &account.uid, encode(account)?, WriteMode::Overwrite)
            .await?;
        Ok(())
    }

    /// Merge new contact details (and optionally a new picture) into a user
    /// profile.
    #[instrument(skip(self, update), fields(has_picture = update.profile_pic.is_some()))]
    pub async fn edit_user_document(&self, uid: &str, update: UserProfileUpdate) -> ReturnType {
        let mut fields = json!({
            "email": update.email,
            "telephone": update.telephone,
            "name": self.name_or_default(&update.name),
        });
        if let Some(picture) = &update.profile_pic {
            let Some(url) = self.upload_profile_picture(picture, uid).await else {
                return ReturnType::UserUpdateFailed;
            };
            fields["profile_pic"] = url.into();
        }

        match self.merge(&self.collections.users, uid, &fields).await {
            Ok(()) => ReturnType::Success,
            Err(e) => {
                error!(error = %e, "Error updating user document");
                ReturnType::UserUpdateFailed
            }
        }
    }

    /// Merge new company details (and optionally a new picture) into a firm
    /// profile.
    #[instrument(skip(self, update), fields(has_picture = update.profile_pic.is_some()))]
    pub async fn edit_firm_account(&self, uid: &str, update: FirmProfileUpdate) -> ReturnType {
        let mut fields = json!({
            "company_name": update.company_name,
            "representative_name": update.representative_name,
            "tax_id": update.tax_id,
            "telephone": update.telephone,
        });
        if let Some(picture) = &update.profile_pic {
            let Some(url) = self.upload_profile_picture(picture, uid).await else {
                return ReturnType::UserUpdateFailed;
            };
            fields["profile_pic"] = url.into();
        }

        match self.merge(&self.collections.firms, uid, &fields).await {
            Ok(()) => ReturnType::Success,
            Err(e) => {
                error!(error = %e, "Error updating firm account");
                ReturnType::UserUpdateFailed
            }
        }
    }

    async fn upload_profile_picture(&self, picture: &FileUpload, uid: &str) -> Option<String> {
        let url = self
            .uploads
            .upload_file(picture, uid, &self.profile_picture_folder)
            .await;
        if url.is_none() {
            warn!(uid, "Profile picture upload failed, profile left unchanged");
        }
        url
    }

    pub(crate) async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), DocumentError> {
        self.store
            .set(collection, id, encode(fields)?, WriteMode::Merge)
            .await
    }

    fn name_or_default(&self, name: &str) -> String {
        if name.trim().is_empty() {
            self.default_user_name.clone()
        } else {
            name.to_string()
        }
    }
}
