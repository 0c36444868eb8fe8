//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::UserId;
use crate::domain::ports::{
    CreditLedger, LoginService, MockCreditLedger, MockLoginService, MockSignupService,
    MockTokenVerifier, MockUserProfileQuery, SignupService, TokenServiceError, TokenVerifier,
    UserProfileQuery,
};

use super::state::{HttpState, HttpStatePorts};

/// Bearer token accepted by [`accepting_verifier`].
pub const TEST_TOKEN: &str = "test-token";

pub fn fixture_user_id() -> UserId {
    UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
}

/// Verifier that maps [`TEST_TOKEN`] to [`fixture_user_id`] and rejects
/// everything else.
pub fn accepting_verifier() -> MockTokenVerifier {
    let mut verifier = MockTokenVerifier::new();
    verifier.expect_verify().returning(|token| {
        if token == TEST_TOKEN {
            Ok(fixture_user_id())
        } else {
            Err(TokenServiceError::invalid("unknown token"))
        }
    });
    verifier
}

/// Builder for [`HttpState`] where every port defaults to an expectation-free
/// mock, so unexpected calls fail the test.
pub struct TestStateBuilder {
    ports: HttpStatePorts,
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self {
            ports: HttpStatePorts {
                signup: Arc::new(MockSignupService::new()),
                login: Arc::new(MockLoginService::new()),
                profile: Arc::new(MockUserProfileQuery::new()),
                ledger: Arc::new(MockCreditLedger::new()),
                tokens: Arc::new(accepting_verifier()),
            },
        }
    }
}

impl TestStateBuilder {
    pub fn signup(mut self, port: impl SignupService + 'static) -> Self {
        self.ports.signup = Arc::new(port);
        self
    }

    pub fn login(mut self, port: impl LoginService + 'static) -> Self {
        self.ports.login = Arc::new(port);
        self
    }

    pub fn profile(mut self, port: impl UserProfileQuery + 'static) -> Self {
        self.ports.profile = Arc::new(port);
        self
    }

    pub fn ledger(mut self, port: impl CreditLedger + 'static) -> Self {
        self.ports.ledger = Arc::new(port);
        self
    }

    pub fn tokens(mut self, port: impl TokenVerifier + 'static) -> Self {
        self.ports.tokens = Arc::new(port);
        self
    }

    pub fn build(self) -> HttpState {
        HttpState::new(self.ports)
    }
}

pub fn state_with_verifier(verifier: impl TokenVerifier + 'static) -> HttpState {
    TestStateBuilder::default().tokens(verifier).build()
}
