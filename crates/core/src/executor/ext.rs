//! Extension traits for APDU executors
//!
//! [`Iso7816Ext`] wraps the inter-industry probe commands as one-call
//! helpers over [`Executor::execute`]. Like `execute`, none of them treat a
//! non-success status as an error.

use bytes::Bytes;

use crate::Result;
use crate::command::iso7816::{self, DataObjectTag, FileId};
use crate::executor::Executor;
use crate::response::Response;

/// Inter-industry probe commands available on every executor
pub trait Iso7816Ext: Executor {
    /// SELECT an EF under the current DF
    fn select_ef(&mut self, file_id: FileId, cla: u8) -> Result<Response> {
        self.execute(&iso7816::select_ef(file_id, cla))
    }

    /// SELECT a DF by name
    fn select_df_by_name(&mut self, aid: impl Into<Bytes>, cla: u8) -> Result<Response>
    where
        Self: Sized,
    {
        self.execute(&iso7816::select_df_by_name(aid, cla))
    }

    /// VERIFY against the current EF; `None` only queries the retry counter
    fn verify(&mut self, reference: Option<&[u8]>, cla: u8) -> Result<Response> {
        self.execute(&iso7816::verify(reference, cla))
    }

    /// EXTERNAL AUTHENTICATE against the current EF
    fn external_authenticate(&mut self, data: Option<&[u8]>, cla: u8) -> Result<Response> {
        self.execute(&iso7816::external_authenticate(data, cla))
    }

    /// COMPUTE DIGITAL SIGNATURE with the key of the current EF
    fn compute_signature(&mut self, digest_info: &[u8]) -> Result<Response> {
        self.execute(&iso7816::compute_signature(digest_info))
    }

    /// READ BINARY from offset zero
    fn read_binary(&mut self, cla: u8) -> Result<Response> {
        self.execute(&iso7816::read_binary(cla))
    }

    /// READ RECORD of the first record
    fn read_record(&mut self, cla: u8) -> Result<Response> {
        self.execute(&iso7816::read_record(cla))
    }

    /// GET DATA for a tag
    fn get_data(
        &mut self,
        tag: DataObjectTag,
        simplified_encoding: bool,
        cla: u8,
    ) -> Result<Response> {
        self.execute(&iso7816::get_data(tag, simplified_encoding, cla))
    }
}

impl<E: Executor + ?Sized> Iso7816Ext for E {}
