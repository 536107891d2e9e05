// End-to-end tests for the vibes backend API
//
// Each test boots the real router on an ephemeral port. The Spotify accounts
// service and Web API are both replaced by a per-test mockito server, so
// tests run in parallel without sharing upstream state.

mod helpers;
