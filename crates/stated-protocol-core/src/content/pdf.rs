use serde::{Deserialize, Serialize};

use super::ContentCodec;
use crate::error::Result;
use crate::fields::{FieldSpec, FieldValues};
use crate::types::{Attachment, StatementType};

/// A digital signature of a PDF document.
///
/// Older statements name the document by its hash inside the content.
/// Newer ones omit the hash and attach the file instead, in which case the
/// signed document is the statement's first attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfSigning {
    pub hash: Option<String>,
}

impl PdfSigning {
    /// Hash of the signed document: the inline hash, else the first attachment's.
    pub fn document_hash(&self, attachments: &[String]) -> Option<String> {
        self.hash.clone().or_else(|| {
            attachments
                .first()
                .and_then(|name| Attachment::parse(name).ok())
                .map(|a| a.hash().to_url_safe())
        })
    }
}

impl ContentCodec for PdfSigning {
    const TYPE: StatementType = StatementType::SignPdf;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::fixed("Description", "We hereby digitally sign the referenced PDF file."),
        FieldSpec::optional("PDF file hash"),
    ];

    fn to_fields(&self) -> Result<FieldValues> {
        let mut f = FieldValues::new();
        f.set_opt("PDF file hash", self.hash.as_ref());
        Ok(f)
    }

    fn from_fields(mut f: FieldValues) -> Result<Self> {
        Ok(Self {
            hash: f.take("PDF file hash"),
        })
    }
}
