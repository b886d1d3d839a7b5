use driver::clock::SystemClock;
use driver::database::{
    PostgresDatabase, PostgresLoanRepository, PostgresMemberRepository, PostgresTitleRepository,
};
use kernel::interface::clock::DependOnClock;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::{DependOnLoanQuery, DependOnMemberQuery, DependOnTitleQuery};
use kernel::interface::update::{
    DependOnLoanModifier, DependOnMemberModifier, DependOnTitleModifier,
};
use kernel::prelude::policy::{
    DefaultLoanPolicy, DefaultReservationPolicy, DependOnLoanPolicy, DependOnReservationPolicy,
};
use kernel::KernelError;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    clock: SystemClock,
    loan_policy: DefaultLoanPolicy,
    reservation_policy: DefaultReservationPolicy,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let loan_policy = driver::config::loan_policy()?;
        let reservation_policy = driver::config::reservation_policy()?;
        let pgpool = PostgresDatabase::new().await?;

        Ok(Self {
            pgpool,
            clock: SystemClock,
            loan_policy,
            reservation_policy,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnTitleQuery for Handler {
    type TitleQuery = PostgresTitleRepository;
    fn title_query(&self) -> &Self::TitleQuery {
        &PostgresTitleRepository
    }
}

impl DependOnTitleModifier for Handler {
    type TitleModifier = PostgresTitleRepository;
    fn title_modifier(&self) -> &Self::TitleModifier {
        &PostgresTitleRepository
    }
}

impl DependOnMemberQuery for Handler {
    type MemberQuery = PostgresMemberRepository;
    fn member_query(&self) -> &Self::MemberQuery {
        &PostgresMemberRepository
    }
}

impl DependOnMemberModifier for Handler {
    type MemberModifier = PostgresMemberRepository;
    fn member_modifier(&self) -> &Self::MemberModifier {
        &PostgresMemberRepository
    }
}

impl DependOnLoanQuery for Handler {
    type LoanQuery = PostgresLoanRepository;
    fn loan_query(&self) -> &Self::LoanQuery {
        &PostgresLoanRepository
    }
}

impl DependOnLoanModifier for Handler {
    type LoanModifier = PostgresLoanRepository;
    fn loan_modifier(&self) -> &Self::LoanModifier {
        &PostgresLoanRepository
    }
}

impl DependOnClock for Handler {
    type Clock = SystemClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnLoanPolicy for Handler {
    type LoanPolicy = DefaultLoanPolicy;
    fn loan_policy(&self) -> &Self::LoanPolicy {
        &self.loan_policy
    }
}

impl DependOnReservationPolicy for Handler {
    type ReservationPolicy = DefaultReservationPolicy;
    fn reservation_policy(&self) -> &Self::ReservationPolicy {
        &self.reservation_policy
    }
}
