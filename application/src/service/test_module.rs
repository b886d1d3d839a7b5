use std::sync::Mutex;

use driver::database::{
    InMemoryDatabase, InMemoryLoanRepository, InMemoryMemberRepository, InMemoryTitleRepository,
};
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnLoanQuery, DependOnMemberQuery, DependOnTitleQuery};
use kernel::interface::update::{
    DependOnLoanModifier, DependOnMemberModifier, DependOnTitleModifier,
};
use kernel::prelude::policy::{
    DefaultLoanPolicy, DefaultReservationPolicy, DependOnLoanPolicy, DependOnReservationPolicy,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub struct ManualClock(Mutex<OffsetDateTime>);

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.0.lock().unwrap()
    }
}

/// Services wired to a fresh in-memory store and a clock that only moves when told to.
pub struct TestModule {
    database: InMemoryDatabase,
    clock: ManualClock,
    loan_policy: DefaultLoanPolicy,
    reservation_policy: DefaultReservationPolicy,
}

impl TestModule {
    pub fn new() -> Self {
        Self {
            database: InMemoryDatabase::default(),
            clock: ManualClock(Mutex::new(datetime!(2025-04-01 9:00 UTC))),
            loan_policy: DefaultLoanPolicy::new(Duration::days(7), Duration::days(7)),
            reservation_policy: DefaultReservationPolicy::new(3, Duration::hours(72)),
        }
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    pub fn advance(&self, duration: Duration) {
        *self.clock.0.lock().unwrap() += duration;
    }
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnTitleQuery for TestModule {
    type TitleQuery = InMemoryTitleRepository;
    fn title_query(&self) -> &Self::TitleQuery {
        &InMemoryTitleRepository
    }
}

impl DependOnTitleModifier for TestModule {
    type TitleModifier = InMemoryTitleRepository;
    fn title_modifier(&self) -> &Self::TitleModifier {
        &InMemoryTitleRepository
    }
}

impl DependOnMemberQuery for TestModule {
    type MemberQuery = InMemoryMemberRepository;
    fn member_query(&self) -> &Self::MemberQuery {
        &InMemoryMemberRepository
    }
}

impl DependOnMemberModifier for TestModule {
    type MemberModifier = InMemoryMemberRepository;
    fn member_modifier(&self) -> &Self::MemberModifier {
        &InMemoryMemberRepository
    }
}

impl DependOnLoanQuery for TestModule {
    type LoanQuery = InMemoryLoanRepository;
    fn loan_query(&self) -> &Self::LoanQuery {
        &InMemoryLoanRepository
    }
}

impl DependOnLoanModifier for TestModule {
    type LoanModifier = InMemoryLoanRepository;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        &InMemoryLoanRepository
    }
}

impl DependOnClock for TestModule {
    type Clock = ManualClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnLoanPolicy for TestModule {
    type LoanPolicy = DefaultLoanPolicy;
    fn loan_policy(&self) -> &Self::LoanPolicy {
        &self.loan_policy
    }
}

impl DependOnReservationPolicy for TestModule {
    type ReservationPolicy = DefaultReservationPolicy;
    fn reservation_policy(&self) -> &Self::ReservationPolicy {
        &self.reservation_policy
    }
}
