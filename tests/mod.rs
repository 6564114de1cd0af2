mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Startup wiring, demo data and the fixture file
// - service_tests: Admin and worker operations against the in-memory repository
