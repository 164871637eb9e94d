//! OBEX file operations: PUT, GET, SETPATH and erase.

use tc65_obex::{
    encode_request, is_continue, ByteBuffer, FileContent, Header, ERASE_DISK_PARAMETERS,
    FLAG_SETPATH_CREATE, FLAG_SETPATH_NOCREATE, FLAG_SETPATH_PARENT_FOLDER, FOLDER_LISTING_TYPE,
    REQUEST_FINAL, REQUEST_GET, REQUEST_PUT, REQUEST_SETPATH,
};

use crate::device::Device;
use crate::error::{DeviceError, Result};
use crate::transport::Transport;

/// Object requested by a GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetTarget<'a> {
    /// A file in the current folder.
    File(&'a str),
    /// The XML listing of the current folder.
    FolderListing,
}

impl GetTarget<'_> {
    fn header(&self) -> Header {
        match self {
            GetTarget::File(name) => Header::name(name),
            GetTarget::FolderListing => Header::mime_type(FOLDER_LISTING_TYPE),
        }
    }
}

/// Whether `name` means "the parent folder" for a path change.
///
/// The module has no absolute paths; `""`, `/`, `..`, `a:` and `a:/` all
/// move one level up.
pub fn is_parent_alias(name: &str) -> bool {
    matches!(name, "" | "/" | "..") || name.eq_ignore_ascii_case("a:") || name.eq_ignore_ascii_case("a:/")
}

impl<T: Transport> Device<T> {
    /// Upload `content` in chunks of at most `chunk_size` body bytes.
    ///
    /// The first request carries NAME, LENGTH and (when known) TIME. Only the
    /// last one carries END_OF_BODY and the FINAL bit. An empty file is sent
    /// as a single final request with an empty END_OF_BODY.
    pub fn put(&mut self, content: &FileContent, chunk_size: usize) -> Result<()> {
        self.ensure_obex()?;
        let name = content
            .info
            .name
            .as_deref()
            .ok_or_else(|| DeviceError::Format("file name required for put".to_string()))?;
        let data = content.bytes.as_slice();
        let total = u32::try_from(data.len())
            .map_err(|_| DeviceError::Format(format!("file {} too large", name)))?;

        let chunks: Vec<&[u8]> = if data.is_empty() {
            vec![data]
        } else {
            data.chunks(chunk_size.max(1)).collect()
        };
        tracing::debug!("put {} ({} bytes, {} chunks)", name, total, chunks.len());

        let last_index = chunks.len() - 1;
        for (index, chunk) in chunks.iter().enumerate() {
            let last = index == last_index;
            let mut headers = Vec::with_capacity(4);
            if index == 0 {
                headers.push(Header::name(name));
                headers.push(Header::length(total));
                if let Some(modified) = &content.info.modified {
                    headers.push(Header::time(modified));
                }
            }
            headers.push(Header::body(chunk, last));
            let opcode = if last { REQUEST_PUT | REQUEST_FINAL } else { REQUEST_PUT };
            let request = encode_request(opcode, &[], &headers);
            self.obex_exchange(&request, self.config.timeouts.obex())?;
        }
        Ok(())
    }

    /// Fetch a file or the folder listing, following CONTINUE responses.
    pub fn get(&mut self, target: GetTarget<'_>) -> Result<ByteBuffer> {
        self.ensure_obex()?;
        tracing::debug!("get {:?}", target);
        let request = encode_request(REQUEST_GET | REQUEST_FINAL, &[], &[target.header()]);
        let (mut code, response) = self.obex_exchange(&request, self.config.timeouts.obex())?;
        let mut body = ByteBuffer::from(Self::body_of(&response));

        let next = encode_request(REQUEST_GET, &[], &[]);
        while is_continue(code) {
            let (next_code, response) = self.obex_exchange(&next, self.config.timeouts.obex())?;
            body.append(Self::body_of(&response));
            code = next_code;
        }
        tracing::debug!("got {} bytes", body.len());
        Ok(body)
    }

    /// Change the current folder.
    ///
    /// Parent aliases move one level up; otherwise `name` is entered, and
    /// created first when `create` is set.
    pub fn set_path(&mut self, name: &str, create: bool) -> Result<()> {
        self.ensure_obex()?;
        let request = if is_parent_alias(name) {
            tracing::debug!("setpath ..");
            encode_request(REQUEST_SETPATH, &[FLAG_SETPATH_PARENT_FOLDER, 0x00], &[])
        } else {
            tracing::debug!("setpath {} (create={})", name, create);
            let flags = if create { FLAG_SETPATH_CREATE } else { FLAG_SETPATH_NOCREATE };
            encode_request(REQUEST_SETPATH, &[flags, 0x00], &[Header::name(name)])
        };
        self.obex_exchange(&request, self.config.timeouts.obex())?;
        Ok(())
    }

    /// Create folder `name` in the current folder and stay where we are.
    pub fn make_dir(&mut self, name: &str) -> Result<()> {
        self.set_path(name, true)?;
        self.set_path("..", false)
    }

    /// Delete a file or empty folder in the current folder.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.ensure_obex()?;
        tracing::debug!("delete {}", name);
        let request = encode_request(REQUEST_PUT | REQUEST_FINAL, &[], &[Header::name(name)]);
        self.obex_exchange(&request, self.config.timeouts.obex())?;
        Ok(())
    }

    /// Format the module's flash file system.
    pub fn erase_disk(&mut self) -> Result<()> {
        self.ensure_obex()?;
        tracing::info!("erasing flash file system");
        let request = encode_request(
            REQUEST_PUT | REQUEST_FINAL,
            &[],
            &[Header::app_parameters(&ERASE_DISK_PARAMETERS)],
        );
        self.obex_exchange(&request, self.config.timeouts.erase_disk())?;
        Ok(())
    }
}
