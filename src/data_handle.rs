//! Data handles: byte buffers sliced into value entries.
//!
//! A [`DataHandle`] holds the raw bytes behind a value, either owned by the handle or borrowed
//! from the caller, together with an ordered list of [`ValueEntry`] ranges into those bytes. A
//! value with several entries (a multi-valued field, an array of strings) shares one buffer and
//! the entries select which part each codec call interprets.
//!
//! # Ownership
//!
//! Ownership is carried by the buffer itself rather than a flag next to a pointer:
//!
//! - Data installed with [`DataFlags::MANAGED`] is copied and owned by the handle.
//! - Data installed with [`DataFlags::NON_MANAGED`] is borrowed for the lifetime `'a` and is
//!   never written through. Operations that modify the bytes first copy them into an owned buffer.
//! - [`DataHandle::try_clone`] always produces an owned handle.
//!
//! # Entries
//!
//! A handle with data but no explicitly defined entries exposes the whole buffer as the single
//! entry `0`. The first call to [`DataHandle::append_value_entry`] replaces that implicit entry
//! with explicit ones.
//!
//! # Examples
//!
//! ```rust
//! use fvalue::{DataFlags, DataHandle, Encoding};
//!
//! let record = [0x2a, 0x00, 0x00, 0x00, b'a', b'b', 0x00];
//! let mut handle = DataHandle::new(Encoding::Unspecified);
//! handle.set_data(&record, Encoding::Unspecified, DataFlags::NON_MANAGED)?;
//!
//! let first = handle.append_value_entry(0, 4)?;
//! let second = handle.append_value_entry(4, 3)?;
//!
//! assert_eq!(handle.number_of_value_entries(), 2);
//! assert_eq!(handle.value_entry_data(first)?, &[0x2a, 0x00, 0x00, 0x00]);
//! assert_eq!(handle.value_entry_data(second)?, b"ab\0");
//! # Ok::<(), fvalue::Error>(())
//! ```

use bitflags::bitflags;

use crate::{
    clone::TryClone,
    io::Endianness,
    memory,
    string::Codepage,
    Error::{self, OutOfBounds},
    Result,
};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Ownership flags for the data of a [`DataHandle`]
    pub struct DataFlags: u32 {
        /// The caller keeps ownership; the handle borrows the data
        const NON_MANAGED = 0x0000_0000;
        /// The handle keeps its own copy of the data
        const MANAGED = 0x0000_0002;
    }
}

impl DataFlags {
    /// Validate a raw flag word.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `bits` contains unsupported flags.
    pub fn from_raw(bits: u32) -> Result<DataFlags> {
        DataFlags::from_bits(bits)
            .ok_or_else(|| invalid_argument_error!("Unsupported data flags - 0x{:08x}", bits))
    }
}

/// How the bytes of a data handle are to be interpreted.
///
/// Numeric values use a byte order, string values a codepage. The tag is advisory for the handle
/// itself; the value layer reads it when decoding entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// No interpretation hint
    #[default]
    Unspecified,
    /// Byte order of numeric fields
    ByteOrder(Endianness),
    /// Codepage of string fields
    Codepage(Codepage),
}

/// A `(offset, size)` range inside the buffer of a [`DataHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ValueEntry {
    /// Offset of the first byte of the entry
    pub offset: usize,
    /// Number of bytes in the entry
    pub size: usize,
}

impl ValueEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(offset: usize, size: usize) -> Self {
        ValueEntry { offset, size }
    }

    /// One past the last byte of the entry, or `None` on overflow.
    #[must_use]
    pub fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.size)
    }

    /// Check that the entry lies within a buffer of `data_size` bytes.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the entry extends past `data_size`.
    pub fn check_within(&self, data_size: usize) -> Result<()> {
        match self.end() {
            Some(end) if end <= data_size => Ok(()),
            _ => Err(OutOfBounds),
        }
    }
}

impl TryClone for ValueEntry {
    fn try_clone(&self) -> Result<Self> {
        Ok(*self)
    }
}

#[derive(Debug)]
enum DataBuffer<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a [u8]),
}

impl DataBuffer<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            DataBuffer::Owned(data) => data,
            DataBuffer::Borrowed(data) => data,
        }
    }
}

/// A byte buffer together with the value entries defined over it.
///
/// See the [module documentation](self) for ownership and entry semantics.
#[derive(Debug, Default)]
pub struct DataHandle<'a> {
    buffer: Option<DataBuffer<'a>>,
    encoding: Encoding,
    entries: Vec<ValueEntry>,
}

impl<'a> DataHandle<'a> {
    /// Create an empty data handle.
    ///
    /// ## Arguments
    /// * 'encoding' - Interpretation hint for the data that will be installed
    #[must_use]
    pub fn new(encoding: Encoding) -> Self {
        DataHandle {
            buffer: None,
            encoding,
            entries: Vec::new(),
        }
    }

    /// Returns the data, or `None` if no data has been set.
    #[must_use]
    pub fn data(&self) -> Option<&[u8]> {
        self.buffer.as_ref().map(DataBuffer::as_slice)
    }

    /// Returns the size of the data in bytes, 0 if no data has been set.
    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data().map_or(0, <[u8]>::len)
    }

    /// Returns the interpretation hint of the data.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Replace the interpretation hint of the data.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Install `data` as the buffer of this handle.
    ///
    /// With [`DataFlags::MANAGED`] the bytes are copied into a buffer owned by the handle; with
    /// [`DataFlags::NON_MANAGED`] the handle borrows `data`. Previously defined entries are
    /// discarded.
    ///
    /// ## Arguments
    /// * 'data'     - The bytes to install
    /// * 'encoding' - Interpretation hint for the bytes
    /// * 'flags'    - Ownership flags
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for unsupported flags or a size above `isize::MAX`,
    /// and [`Error::AllocationFailure`] / [`Error::CopyFailure`] if the managed copy fails. The
    /// handle is unchanged on error.
    pub fn set_data(&mut self, data: &'a [u8], encoding: Encoding, flags: DataFlags) -> Result<()> {
        memory::check_size(data.len())?;
        let flags = DataFlags::from_raw(flags.bits())?;

        let buffer = if flags.contains(DataFlags::MANAGED) {
            DataBuffer::Owned(memory::duplicate(data)?)
        } else {
            DataBuffer::Borrowed(data)
        };

        self.buffer = Some(buffer);
        self.encoding = encoding;
        self.entries.clear();

        Ok(())
    }

    /// Install an owned buffer, taking ownership of `data` without copying.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a size above `isize::MAX`.
    pub fn set_data_owned(&mut self, data: Vec<u8>, encoding: Encoding) -> Result<()> {
        memory::check_size(data.len())?;

        self.buffer = Some(DataBuffer::Owned(data));
        self.encoding = encoding;
        self.entries.clear();

        Ok(())
    }

    /// Returns the ownership flags of the data.
    ///
    /// A handle without data reports [`DataFlags::NON_MANAGED`].
    #[must_use]
    pub fn data_flags(&self) -> DataFlags {
        match self.buffer {
            Some(DataBuffer::Owned(_)) => DataFlags::MANAGED,
            _ => DataFlags::NON_MANAGED,
        }
    }

    /// Change the ownership flags of the data.
    ///
    /// Setting [`DataFlags::MANAGED`] on borrowed data copies it into an owned buffer. Owned data
    /// cannot be handed back to the caller, so clearing the flag on owned data is rejected.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for unsupported flags or when releasing owned data,
    /// and memory errors if the copy fails.
    pub fn set_data_flags(&mut self, flags: DataFlags) -> Result<()> {
        let flags = DataFlags::from_raw(flags.bits())?;

        let borrowed = matches!(self.buffer, Some(DataBuffer::Borrowed(_)));
        let owned = matches!(self.buffer, Some(DataBuffer::Owned(_)));

        if borrowed && flags.contains(DataFlags::MANAGED) {
            return self.make_owned();
        }
        if owned && !flags.contains(DataFlags::MANAGED) {
            return Err(invalid_argument_error!(
                "Owned data cannot be changed to non-managed"
            ));
        }
        Ok(())
    }

    /// Zero the data in place.
    ///
    /// The buffer keeps its size and entries stay defined. Borrowed data is never written: it is
    /// replaced by an owned, zero-filled buffer of the same size.
    ///
    /// # Errors
    /// Returns [`Error::CopyFailure`] if the fill fails or a memory error if the replacement
    /// buffer cannot be allocated.
    pub fn clear(&mut self) -> Result<()> {
        match &mut self.buffer {
            None => Ok(()),
            Some(DataBuffer::Owned(data)) => memory::zero(data),
            Some(DataBuffer::Borrowed(data)) => {
                let zeroed = memory::allocate(data.len())?;
                self.buffer = Some(DataBuffer::Owned(zeroed));
                Ok(())
            }
        }
    }

    /// Create an owned deep copy of this handle.
    ///
    /// The copy owns its buffer regardless of how the source holds its data, so it is not tied to
    /// the lifetime of the source's borrowed bytes.
    ///
    /// # Errors
    /// Returns memory errors if the buffer or entry list cannot be copied.
    pub fn try_clone(&self) -> Result<DataHandle<'static>> {
        let buffer = match self.data() {
            Some(data) => Some(DataBuffer::Owned(memory::duplicate(data)?)),
            None => None,
        };

        let mut entries = Vec::new();
        memory::reserve(&mut entries, self.entries.len())?;
        entries.extend_from_slice(&self.entries);

        Ok(DataHandle {
            buffer,
            encoding: self.encoding,
            entries,
        })
    }

    /// Returns the number of value entries.
    ///
    /// 0 if no data has been set; 1 if data is set but no entries were defined.
    #[must_use]
    pub fn number_of_value_entries(&self) -> usize {
        match self.buffer {
            None => 0,
            Some(_) if self.entries.is_empty() => 1,
            Some(_) => self.entries.len(),
        }
    }

    /// Returns the value entry at `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `index` is not below the entry count.
    pub fn value_entry(&self, index: usize) -> Result<ValueEntry> {
        self.check_index(index)?;

        if self.entries.is_empty() {
            return Ok(ValueEntry::new(0, self.data_size()));
        }

        Ok(self.entries[index])
    }

    /// Redefine the value entry at `index`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an invalid index or size, and
    /// [`Error::OutOfBounds`] if the range does not fit the current data.
    pub fn set_value_entry(&mut self, index: usize, offset: usize, size: usize) -> Result<()> {
        self.check_index(index)?;
        let entry = self.checked_entry(offset, size)?;

        if self.entries.is_empty() {
            memory::reserve(&mut self.entries, 1)?;
            self.entries.push(entry);
        } else {
            self.entries[index] = entry;
        }

        Ok(())
    }

    /// Define a new value entry and return its index.
    ///
    /// Indices are assigned sequentially from 0. On a handle whose whole buffer was the implicit
    /// entry, the first appended entry takes index 0.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if no data is set or a size is invalid, and
    /// [`Error::OutOfBounds`] if the range does not fit the data.
    pub fn append_value_entry(&mut self, offset: usize, size: usize) -> Result<usize> {
        if self.buffer.is_none() {
            return Err(invalid_argument_error!("Data handle has no data"));
        }
        let entry = self.checked_entry(offset, size)?;

        memory::reserve(&mut self.entries, 1)?;
        self.entries.push(entry);

        Ok(self.entries.len() - 1)
    }

    /// Returns the bytes of the value entry at `index`.
    ///
    /// The range is validated against the data as it is now, so an entry that no longer fits
    /// is reported rather than read.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an invalid index and [`Error::OutOfBounds`] if the
    /// entry does not fit the data.
    pub fn value_entry_data(&self, index: usize) -> Result<&[u8]> {
        let entry = self.value_entry(index)?;
        let data = self.data().unwrap_or_default();

        entry.check_within(data.len())?;
        Ok(&data[entry.offset..entry.offset + entry.size])
    }

    /// Overwrite the bytes of the value entry at `index`.
    ///
    /// `data` must be exactly as long as the entry, and the entry must lie inside the existing
    /// buffer; the buffer never grows here. Borrowed data is copied into an owned buffer before
    /// it is written.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for an invalid index or a size mismatch,
    /// [`Error::OutOfBounds`] if the entry does not fit the data, and memory errors. The buffer
    /// is unmodified on error.
    pub fn set_value_entry_data(&mut self, index: usize, data: &[u8]) -> Result<()> {
        memory::check_size(data.len())?;
        let entry = self.value_entry(index)?;

        if data.len() != entry.size {
            return Err(invalid_argument_error!(
                "Entry {} holds {} bytes, got {}",
                index,
                entry.size,
                data.len()
            ));
        }
        entry.check_within(self.data_size())?;

        let range = entry.offset..entry.offset + entry.size;
        match &mut self.buffer {
            Some(DataBuffer::Owned(buffer)) => memory::copy(&mut buffer[range], data),
            Some(DataBuffer::Borrowed(borrowed)) => {
                let mut owned = memory::duplicate(borrowed)?;
                memory::copy(&mut owned[range], data)?;
                tracing::debug!(size = owned.len(), "borrowed data copied before write");
                self.buffer = Some(DataBuffer::Owned(owned));
                Ok(())
            }
            None => Err(OutOfBounds),
        }
    }

    /// Append `data` to the buffer and define a value entry covering it.
    ///
    /// On a handle without data this installs an owned copy of `data` as entry 0. When the
    /// existing data was the implicit whole-buffer entry, that entry is made explicit first so
    /// it keeps index 0.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] for a size above `isize::MAX` and memory errors. The
    /// handle is unchanged on error.
    pub fn append_value_entry_data(&mut self, data: &[u8]) -> Result<usize> {
        memory::check_size(data.len())?;

        let offset = self.data_size();
        let Some(new_size) = offset.checked_add(data.len()) else {
            return Err(OutOfBounds);
        };
        memory::check_size(new_size)?;

        let implicit = match &self.buffer {
            Some(_) if self.entries.is_empty() => Some(ValueEntry::new(0, offset)),
            _ => None,
        };

        let mut grown = memory::allocate(new_size)?;
        if let Some(existing) = self.data() {
            memory::copy(&mut grown[..offset], existing)?;
        }
        memory::copy(&mut grown[offset..], data)?;

        let additional = if implicit.is_some() { 2 } else { 1 };
        memory::reserve(&mut self.entries, additional)?;

        if let Some(implicit) = implicit {
            self.entries.push(implicit);
        }
        self.entries.push(ValueEntry::new(offset, data.len()));
        self.buffer = Some(DataBuffer::Owned(grown));

        Ok(self.entries.len() - 1)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let count = self.number_of_value_entries();
        if index >= count {
            return Err(invalid_argument_error!(
                "Value entry index {} out of range [0, {})",
                index,
                count
            ));
        }
        Ok(())
    }

    fn checked_entry(&self, offset: usize, size: usize) -> Result<ValueEntry> {
        memory::check_size(offset)?;
        memory::check_size(size)?;

        let entry = ValueEntry::new(offset, size);
        entry.check_within(self.data_size())?;
        Ok(entry)
    }

    fn make_owned(&mut self) -> Result<()> {
        match &self.buffer {
            Some(DataBuffer::Borrowed(data)) => {
                let owned = memory::duplicate(data)?;
                tracing::debug!(size = owned.len(), "borrowed data promoted to managed");
                self.buffer = Some(DataBuffer::Owned(owned));
                Ok(())
            }
            Some(DataBuffer::Owned(_)) => Ok(()),
            None => Err(Error::NotSupported),
        }
    }
}

impl<'a> TryClone for DataHandle<'a> {
    fn try_clone(&self) -> Result<Self> {
        DataHandle::try_clone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clone::clone_optional,
        memory::fault::{arm, calls, disarm, Primitive},
    };

    const DATA: [u8; 32] = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f, 0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x1b, 0x1c, 0x1d,
        0x1e, 0x1f,
    ];

    fn managed() -> DataHandle<'static> {
        let mut handle = DataHandle::new(Encoding::Unspecified);
        handle
            .set_data(&DATA, Encoding::Unspecified, DataFlags::MANAGED)
            .unwrap();
        handle
    }

    #[test]
    fn empty_handle() {
        let handle = DataHandle::new(Encoding::ByteOrder(Endianness::Little));

        assert!(handle.data().is_none());
        assert_eq!(handle.data_size(), 0);
        assert_eq!(handle.number_of_value_entries(), 0);
        assert_eq!(handle.encoding(), Encoding::ByteOrder(Endianness::Little));
        assert_eq!(handle.data_flags(), DataFlags::NON_MANAGED);
        assert!(handle.value_entry(0).is_err());
        assert!(handle.value_entry_data(0).is_err());
    }

    #[test]
    fn set_data_flags() {
        let mut handle = DataHandle::new(Encoding::Unspecified);

        handle
            .set_data(&DATA, Encoding::Unspecified, DataFlags::NON_MANAGED)
            .unwrap();
        assert_eq!(handle.data_flags(), DataFlags::NON_MANAGED);
        assert_eq!(handle.data().unwrap().as_ptr(), DATA.as_ptr());

        handle.set_data_flags(DataFlags::MANAGED).unwrap();
        assert_eq!(handle.data_flags(), DataFlags::MANAGED);
        assert_ne!(handle.data().unwrap().as_ptr(), DATA.as_ptr());
        assert_eq!(handle.data().unwrap(), &DATA);

        assert!(handle.set_data_flags(DataFlags::NON_MANAGED).is_err());
        assert!(handle
            .set_data_flags(DataFlags::from_bits_retain(0x80))
            .is_err());
        assert!(DataFlags::from_raw(0x01).is_err());
    }

    #[test]
    fn set_data_rejects_unknown_flags() {
        let mut handle = managed();
        let result = handle.set_data(
            &DATA[..4],
            Encoding::Unspecified,
            DataFlags::from_bits_retain(0xff),
        );

        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        assert_eq!(handle.data().unwrap(), &DATA);
    }

    #[test]
    fn implicit_entry() {
        let handle = managed();

        assert_eq!(handle.number_of_value_entries(), 1);
        assert_eq!(handle.value_entry(0).unwrap(), ValueEntry::new(0, 32));
        assert_eq!(handle.value_entry_data(0).unwrap(), &DATA);
        assert!(handle.value_entry(1).is_err());
    }

    #[test]
    fn append_and_set_entries() {
        let mut handle = managed();

        assert_eq!(handle.append_value_entry(0, 8).unwrap(), 0);
        assert_eq!(handle.append_value_entry(8, 24).unwrap(), 1);
        assert_eq!(handle.number_of_value_entries(), 2);

        assert!(handle.append_value_entry(8, 25).is_err());
        assert!(matches!(
            handle.append_value_entry(usize::MAX, 1),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(handle.number_of_value_entries(), 2);

        handle.set_value_entry(1, 16, 16).unwrap();
        assert_eq!(handle.value_entry(1).unwrap(), ValueEntry::new(16, 16));
        assert_eq!(handle.value_entry_data(1).unwrap(), &DATA[16..]);

        assert!(matches!(
            handle.set_value_entry(1, 17, 16),
            Err(Error::OutOfBounds)
        ));
        assert!(matches!(
            handle.set_value_entry(2, 0, 1),
            Err(Error::InvalidArgument { .. })
        ));
        assert_eq!(handle.value_entry(1).unwrap(), ValueEntry::new(16, 16));

        for index in 0..handle.number_of_value_entries() {
            let entry = handle.value_entry(index).unwrap();
            assert!(entry.offset + entry.size <= handle.data_size());
        }
    }

    #[test]
    fn append_without_data() {
        let mut handle = DataHandle::new(Encoding::Unspecified);
        assert!(handle.append_value_entry(0, 0).is_err());
    }

    #[test]
    fn set_value_entry_data_in_range() {
        let mut handle = managed();
        handle.append_value_entry(28, 4).unwrap();

        handle
            .set_value_entry_data(0, &[0xaa, 0xbb, 0xcc, 0xdd])
            .unwrap();
        assert_eq!(&handle.data().unwrap()[28..], &[0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(&handle.data().unwrap()[..28], &DATA[..28]);
    }

    #[test]
    fn set_value_entry_data_out_of_range() {
        let mut handle = managed();

        // Entry 0 covers the whole 32 byte buffer; 32 more bytes past its end do not fit.
        let result = handle.set_value_entry_data(0, &[0xff; 64]);
        assert!(result.is_err());
        assert_eq!(handle.data().unwrap(), &DATA);

        let result = handle.set_value_entry_data(0, &[0xff; 31]);
        assert!(result.is_err());
        assert_eq!(handle.data().unwrap(), &DATA);

        assert!(handle.set_value_entry_data(1, &[0xff; 32]).is_err());
        assert_eq!(handle.data().unwrap(), &DATA);
    }

    #[test]
    fn set_value_entry_data_borrowed_is_not_written_through() {
        let source = DATA;
        let mut handle = DataHandle::new(Encoding::Unspecified);
        handle
            .set_data(&source, Encoding::Unspecified, DataFlags::NON_MANAGED)
            .unwrap();
        handle.append_value_entry(0, 2).unwrap();

        handle.set_value_entry_data(0, &[0xee, 0xee]).unwrap();

        assert_eq!(source, DATA);
        assert_eq!(handle.data_flags(), DataFlags::MANAGED);
        assert_eq!(&handle.data().unwrap()[..2], &[0xee, 0xee]);
    }

    #[test]
    fn append_value_entry_data() {
        let mut handle = DataHandle::new(Encoding::Unspecified);

        assert_eq!(handle.append_value_entry_data(b"abc").unwrap(), 0);
        assert_eq!(handle.append_value_entry_data(b"de").unwrap(), 1);
        assert_eq!(handle.data().unwrap(), b"abcde");
        assert_eq!(handle.value_entry(1).unwrap(), ValueEntry::new(3, 2));
        assert_eq!(handle.value_entry_data(1).unwrap(), b"de");
    }

    #[test]
    fn append_value_entry_data_keeps_implicit_entry() {
        let mut handle = DataHandle::new(Encoding::Unspecified);
        handle
            .set_data(&DATA[..4], Encoding::Unspecified, DataFlags::NON_MANAGED)
            .unwrap();

        assert_eq!(handle.append_value_entry_data(&[0xff]).unwrap(), 1);
        assert_eq!(handle.value_entry(0).unwrap(), ValueEntry::new(0, 4));
        assert_eq!(handle.value_entry_data(1).unwrap(), &[0xff]);
    }

    #[test]
    fn clear() {
        let mut handle = managed();
        handle.append_value_entry(0, 4).unwrap();
        handle.clear().unwrap();

        assert_eq!(handle.data().unwrap(), &[0u8; 32]);
        assert_eq!(handle.number_of_value_entries(), 1);

        let source = DATA;
        let mut borrowed = DataHandle::new(Encoding::Unspecified);
        borrowed
            .set_data(&source, Encoding::Unspecified, DataFlags::NON_MANAGED)
            .unwrap();
        borrowed.clear().unwrap();
        assert_eq!(borrowed.data().unwrap(), &[0u8; 32]);
        assert_eq!(source, DATA);
    }

    #[test]
    fn clone() {
        let source = DATA;
        let mut handle = DataHandle::new(Encoding::ByteOrder(Endianness::Big));
        handle
            .set_data(
                &source,
                Encoding::ByteOrder(Endianness::Big),
                DataFlags::NON_MANAGED,
            )
            .unwrap();
        handle.append_value_entry(4, 4).unwrap();

        let copy = handle.try_clone().unwrap();
        assert_eq!(copy.data_flags(), DataFlags::MANAGED);
        assert_eq!(copy.data().unwrap(), &DATA);
        assert_eq!(copy.encoding(), Encoding::ByteOrder(Endianness::Big));
        assert_eq!(copy.value_entry(0).unwrap(), ValueEntry::new(4, 4));

        let nothing: Option<&DataHandle> = None;
        assert!(clone_optional(nothing).unwrap().is_none());
    }

    #[test]
    fn clone_fault_injection() {
        let mut handle = managed();
        handle.append_value_entry(0, 1).unwrap();

        for nth in 0..2 {
            arm(Primitive::Allocate, nth);
            assert!(matches!(
                handle.try_clone(),
                Err(Error::AllocationFailure(_))
            ));
        }

        arm(Primitive::Copy, 0);
        assert!(matches!(handle.try_clone(), Err(Error::CopyFailure)));

        disarm();
        assert!(handle.try_clone().is_ok());
        assert_eq!(calls(Primitive::Allocate), 2);
    }

    #[test]
    fn set_data_fault_injection() {
        let mut handle = DataHandle::new(Encoding::Unspecified);

        arm(Primitive::Allocate, 0);
        assert!(handle
            .set_data(&DATA, Encoding::Unspecified, DataFlags::MANAGED)
            .is_err());
        assert!(handle.data().is_none());

        arm(Primitive::Copy, 0);
        assert!(handle
            .set_data(&DATA, Encoding::Unspecified, DataFlags::MANAGED)
            .is_err());
        assert!(handle.data().is_none());
        disarm();
    }

    #[test]
    fn append_data_fault_injection() {
        let mut handle = managed();
        handle.append_value_entry(0, 32).unwrap();

        // allocate buffer, reserve entry
        for nth in 0..2 {
            arm(Primitive::Allocate, nth);
            assert!(handle.append_value_entry_data(&[1, 2, 3]).is_err());
            assert_eq!(handle.data().unwrap(), &DATA);
            assert_eq!(handle.number_of_value_entries(), 1);
        }

        // copy existing bytes, copy appended bytes
        for nth in 0..2 {
            arm(Primitive::Copy, nth);
            assert!(handle.append_value_entry_data(&[1, 2, 3]).is_err());
            assert_eq!(handle.data().unwrap(), &DATA);
        }
        disarm();
    }

    #[test]
    fn clear_fault_injection() {
        let mut handle = managed();

        arm(Primitive::Zero, 0);
        assert!(matches!(handle.clear(), Err(Error::CopyFailure)));
        assert_eq!(handle.data().unwrap(), &DATA);
        disarm();
    }
}
