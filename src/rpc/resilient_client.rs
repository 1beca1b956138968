use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::RpcFilterType,
    rpc_request::RpcError,
};
use solana_sdk::{account::Account, commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::sync::Arc;
use tracing::{debug, info};

use super::retry::{fetch_with_retry, FetchError, RetryConfig};
use crate::decoders::{
    decode_position,
    raydium::clmm::{PositionDecoder, RAYDIUM_POSITION_ACCOUNT_LEN},
    Position, RawAccount,
};

const HTTP_TOO_MANY_REQUESTS: u16 = 429;
const HTTP_NOT_FOUND: u16 = 404;
const TOO_MANY_REQUESTS: &str = "Too Many Requests";

/// Premier compte du lot qui contient `mint` avec des ticks valides à proximité.
fn first_anchored_position(mint: &Pubkey, accounts: &[(Pubkey, Account)]) -> Option<(Pubkey, Position)> {
    let decoder = PositionDecoder::nft_anchored(*mint);
    accounts.iter().find_map(|(address, account)| match decoder.decode(&account.data) {
        Ok(position) => Some((*address, position)),
        Err(e) => {
            debug!(%address, error = %e, "Compte candidat écarté.");
            None
        }
    })
}

/// Un "wrapper" autour du RpcClient de Solana qui ajoute la logique de
/// ré-essai de `fetch_with_retry` et renvoie des comptes bruts prêts à décoder.
#[derive(Clone)]
pub struct ResilientRpcClient {
    client: Arc<RpcClient>,
    retry: RetryConfig,
}

impl ResilientRpcClient {
    /// Construit un nouveau client RPC résilient.
    pub fn new(rpc_url: String, retry: RetryConfig) -> Self {
        Self {
            client: Arc::new(RpcClient::new_with_commitment(rpc_url, CommitmentConfig::confirmed())),
            retry,
        }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Range une erreur du client dans la taxonomie de `FetchError`.
    pub fn classify(error: &ClientError) -> FetchError {
        match error.kind() {
            ClientErrorKind::Reqwest(e) => match e.status().map(|status| status.as_u16()) {
                Some(HTTP_TOO_MANY_REQUESTS) => return FetchError::RateLimited,
                Some(HTTP_NOT_FOUND) => return FetchError::NotFound,
                _ => {}
            },
            ClientErrorKind::RpcError(RpcError::RpcResponseError { code, .. })
                if *code == HTTP_TOO_MANY_REQUESTS as i64 =>
            {
                return FetchError::RateLimited;
            }
            _ => {}
        }
        // Jamais sur les chiffres seuls : une adresse ou un slot peut contenir "429".
        let message = error.to_string();
        if message.contains(TOO_MANY_REQUESTS) {
            FetchError::RateLimited
        } else {
            FetchError::Transport(message)
        }
    }

    /// Récupère un compte. Un compte absent donne `NotFound`, sans ré-essai.
    pub async fn get_raw_account(&self, pubkey: &Pubkey) -> Result<RawAccount, FetchError> {
        self.get_raw_account_with_min_len(pubkey, 0).await
    }

    /// Comme `get_raw_account`, mais des données plus courtes que `min_len`
    /// sont traitées comme une réponse tronquée (et donc réessayées).
    pub async fn get_raw_account_with_min_len(
        &self,
        pubkey: &Pubkey,
        min_len: usize,
    ) -> Result<RawAccount, FetchError> {
        let client = &self.client;
        fetch_with_retry(
            || async move {
                let response = client
                    .get_account_with_commitment(pubkey, client.commitment())
                    .await
                    .map_err(|e| Self::classify(&e))?;
                let account = response.value.ok_or(FetchError::NotFound)?;
                if account.data.len() < min_len {
                    return Err(FetchError::Truncated {
                        expected: min_len,
                        received: account.data.len(),
                    });
                }
                debug!(%pubkey, len = account.data.len(), owner = %account.owner, "Compte récupéré.");
                Ok(RawAccount::from(account))
            },
            &self.retry,
        )
        .await
    }

    /// Récupère plusieurs comptes en un seul appel. Le ré-essai porte sur le lot ;
    /// chaque compte absent donne son propre `NotFound`.
    pub async fn get_raw_accounts(
        &self,
        pubkeys: &[Pubkey],
    ) -> Result<Vec<Result<RawAccount, FetchError>>, FetchError> {
        let client = &self.client;
        let accounts = fetch_with_retry(
            || async move {
                client
                    .get_multiple_accounts(pubkeys)
                    .await
                    .map_err(|e| Self::classify(&e))
            },
            &self.retry,
        )
        .await?;

        Ok(accounts
            .into_iter()
            .map(|account| account.map(RawAccount::from).ok_or(FetchError::NotFound))
            .collect())
    }

    /// Comptes d'un programme dont les données font exactement `data_size` octets.
    pub async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: u64,
    ) -> Result<Vec<(Pubkey, Account)>, FetchError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(data_size)]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: None,
                commitment: Some(self.client.commitment()),
                min_context_slot: None,
            },
            with_context: Some(false),
            sort_results: None,
        };
        let client = &self.client;
        fetch_with_retry(
            || {
                let config = config.clone();
                async move {
                    client
                        .get_program_accounts_with_config(program_id, config)
                        .await
                        .map_err(|e| Self::classify(&e))
                }
            },
            &self.retry,
        )
        .await
    }

    /// Retrouve la position associée à une NFT de position.
    ///
    /// L'adresse est d'abord lue comme un compte de position. Sinon, chaque
    /// programme CLMM est parcouru et le premier compte qui contient le mint,
    /// avec des ticks valides à proximité, l'emporte. `NotFound` si rien ne correspond.
    pub async fn find_position_by_nft_mint(
        &self,
        nft_mint: &Pubkey,
        clmm_program_ids: &[Pubkey],
    ) -> Result<(Pubkey, Position), FetchError> {
        match self.get_raw_account(nft_mint).await {
            Ok(raw) if clmm_program_ids.contains(&raw.owner) => match decode_position(&raw) {
                Ok(position) => return Ok((*nft_mint, position)),
                Err(e) => debug!(%nft_mint, error = %e, "Adresse CLMM non décodable, recherche par mint."),
            },
            Ok(_) | Err(FetchError::NotFound) => {}
            Err(e) => return Err(e),
        }

        for program_id in clmm_program_ids {
            let accounts = self
                .get_program_accounts_by_size(program_id, RAYDIUM_POSITION_ACCOUNT_LEN as u64)
                .await?;
            info!(%program_id, candidates = accounts.len(), "Recherche de la position par mint de NFT.");
            if let Some(found) = first_anchored_position(nft_mint, &accounts) {
                return Ok(found);
            }
        }
        Err(FetchError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_client::rpc_request::RpcResponseErrorData;

    #[test]
    fn rate_limit_messages_are_classified() {
        let error = ClientError::from(ClientErrorKind::Custom(
            "HTTP status client error (429 Too Many Requests)".to_string(),
        ));
        assert!(matches!(ResilientRpcClient::classify(&error), FetchError::RateLimited));
    }

    #[test]
    fn digits_alone_do_not_mean_rate_limited() {
        let error = ClientError::from(ClientErrorKind::Custom(
            "AccountNotFound: pubkey=4291aBcd, slot 142900".to_string(),
        ));
        assert!(matches!(ResilientRpcClient::classify(&error), FetchError::Transport(_)));
    }

    #[test]
    fn json_rpc_429_code_is_rate_limited() {
        let error = ClientError::from(ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code: 429,
            message: "rate limit exceeded".to_string(),
            data: RpcResponseErrorData::Empty,
        }));
        assert!(matches!(ResilientRpcClient::classify(&error), FetchError::RateLimited));

        let error = ClientError::from(ClientErrorKind::RpcError(RpcError::RpcResponseError {
            code: -32002,
            message: "Transaction simulation failed: 429 instructions".to_string(),
            data: RpcResponseErrorData::Empty,
        }));
        assert!(matches!(ResilientRpcClient::classify(&error), FetchError::Transport(_)));
    }

    fn account(data: Vec<u8>) -> Account {
        Account {
            lamports: 1,
            data,
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        }
    }

    #[test]
    fn anchored_search_picks_the_account_holding_the_mint() {
        let mint = Pubkey::new_from_array([0x33; 32]);
        let mut holder = vec![0x7Fu8; RAYDIUM_POSITION_ACCOUNT_LEN];
        holder[8..40].copy_from_slice(mint.as_ref());
        holder[72..76].copy_from_slice(&(-60i32).to_le_bytes());
        holder[76..80].copy_from_slice(&60i32.to_le_bytes());

        let mut valid_elsewhere = vec![0x7Fu8; RAYDIUM_POSITION_ACCOUNT_LEN];
        valid_elsewhere[72..76].copy_from_slice(&(-1i32).to_le_bytes());
        valid_elsewhere[76..80].copy_from_slice(&1i32.to_le_bytes());

        let other = Pubkey::new_unique();
        let target = Pubkey::new_unique();
        let accounts = vec![(other, account(valid_elsewhere)), (target, account(holder))];

        let (address, position) = first_anchored_position(&mint, &accounts).unwrap();
        assert_eq!(address, target);
        assert_eq!((position.tick_lower, position.tick_upper), (-60, 60));
        assert!(position.source_offset.is_heuristic());
        assert!(first_anchored_position(&Pubkey::new_unique(), &accounts).is_none());
    }

    #[test]
    fn other_errors_are_transport_errors() {
        let error = ClientError::from(ClientErrorKind::Custom("connection reset".to_string()));
        match ResilientRpcClient::classify(&error) {
            FetchError::Transport(message) => assert!(message.contains("connection reset")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
