/*
 * Responsibility
 * - v1 の request/response DTO (JSON は camelCase)
 */
pub mod accounts;
pub mod items;
pub mod payments;
pub mod requests;
