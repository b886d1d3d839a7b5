use error_stack::Report;

use crate::entity::{BookCopy, CopyId, CopyStatus};
use crate::KernelError;

/// All copies of one title, kept in the order they were added.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CopyCollection(Vec<BookCopy>);

impl CopyCollection {
    pub fn new(copies: impl Into<Vec<BookCopy>>) -> Self {
        Self(copies.into())
    }

    pub fn add(&mut self, copy: BookCopy) {
        self.0.push(copy);
    }

    pub fn all_loaned(&self) -> error_stack::Result<bool, KernelError> {
        if self.0.is_empty() {
            return Err(Report::new(KernelError::EmptyCollection)
                .attach_printable("availability of a title without copies is undefined"));
        }
        Ok(self.0.iter().all(BookCopy::is_loaned))
    }

    pub fn first_available(&self) -> Option<&BookCopy> {
        self.0.iter().find(|copy| copy.is_available())
    }

    /// Forces every listed copy back into circulation. Unknown ids are skipped.
    pub fn restore_all_to_available(&mut self, ids: &[CopyId]) {
        self.0
            .iter_mut()
            .filter(|copy| ids.contains(copy.id()))
            .for_each(BookCopy::restore_to_available);
    }

    pub fn find(&self, id: &CopyId) -> Option<&BookCopy> {
        self.0.iter().find(|copy| copy.id() == id)
    }

    pub(in crate::entity) fn find_mut(&mut self, id: &CopyId) -> Option<&mut BookCopy> {
        self.0.iter_mut().find(|copy| copy.id() == id)
    }

    pub fn count(&self, status: CopyStatus) -> usize {
        self.0.iter().filter(|copy| copy.status() == &status).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookCopy> {
        self.0.iter()
    }
}

impl From<CopyCollection> for Vec<BookCopy> {
    fn from(value: CopyCollection) -> Self {
        value.0
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::entity::{BookCopy, CopyCollection, CopyId, CopyStatus, TitleId};
    use crate::KernelError;

    fn collection(statuses: &[CopyStatus]) -> CopyCollection {
        let title_id = TitleId::new(Uuid::new_v4());
        CopyCollection::new(
            statuses
                .iter()
                .map(|status| BookCopy::new(CopyId::generate(), title_id.clone(), *status))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn all_loaned_fails_on_empty_collection() {
        let error = CopyCollection::default().all_loaned().unwrap_err();
        assert!(matches!(error.current_context(), KernelError::EmptyCollection));
    }

    #[test]
    fn all_loaned_ignores_nothing_but_loaned() {
        let loaned = collection(&[CopyStatus::Loaned, CopyStatus::Loaned]);
        assert!(loaned.all_loaned().unwrap());

        let held = collection(&[CopyStatus::Loaned, CopyStatus::OnHold]);
        assert!(!held.all_loaned().unwrap());
    }

    #[test]
    fn first_available_is_insertion_ordered() {
        let copies = collection(&[
            CopyStatus::Loaned,
            CopyStatus::Available,
            CopyStatus::Available,
        ]);
        let expected = copies.iter().nth(1).unwrap().id().clone();
        assert_eq!(copies.first_available().unwrap().id(), &expected);

        let none = collection(&[CopyStatus::Loaned, CopyStatus::OnHold]);
        assert!(none.first_available().is_none());
    }

    #[test]
    fn restore_skips_unknown_ids() {
        let mut copies = collection(&[CopyStatus::OnHold, CopyStatus::Loaned]);
        let held = copies.iter().next().unwrap().id().clone();

        copies.restore_all_to_available(&[held.clone(), CopyId::generate()]);

        assert!(copies.find(&held).unwrap().is_available());
        assert_eq!(copies.count(CopyStatus::Loaned), 1);
    }
}
