//! Encryption profile reconstruction.
//!
//! madwifi has no single "security settings" query. The profile is pieced
//! together from six independent driver queries, any of which may fail on a
//! given interface (an unconfigured key slot, a station-mode VIF that never
//! negotiated WPA). A failed query leaves its field at zero; the profile as a
//! whole never fails.

use iwinfo_core::{
    AuthAlgorithms, AuthSuite, CipherSet, ControlChannel, EncryptionProfile, InterfaceName,
    Response, Result,
};
use tracing::debug;

use crate::commands::{self, Command, Param, VendorAuthMode, VendorCipher};

/// WEP key length selecting the 104-bit flag.
const WEP104_KEY_LEN: u32 = 13;
/// WEP key length selecting the 40-bit flag.
const WEP40_KEY_LEN: u32 = 5;

fn send(channel: &dyn ControlChannel, ifname: &InterfaceName, cmd: Command) -> Result<Response> {
    channel.request(ifname, cmd.opcode, cmd.payload.as_deref())
}

fn get_param(channel: &dyn ControlChannel, ifname: &InterfaceName, param: Param) -> Option<u32> {
    match send(channel, ifname, commands::cmd_get_param(param)) {
        Ok(reply) => Some(reply.value_u32()),
        Err(e) => {
            debug!(ifname = %ifname, ?param, error = %e, "parameter query failed");
            None
        }
    }
}

/// Key management suite for a driver authentication mode.
pub fn auth_suite_for(mode: VendorAuthMode) -> AuthSuite {
    match mode {
        VendorAuthMode::Ieee8021x => AuthSuite::Ieee8021x,
        VendorAuthMode::Wpa => AuthSuite::Psk,
        _ => AuthSuite::None,
    }
}

/// Flag for one cipher. WEP is sized by the group key length and has no
/// flag when the length is neither 5 nor 13.
pub fn cipher_flag(cipher: VendorCipher, key_len: u32) -> CipherSet {
    match cipher {
        VendorCipher::Tkip => CipherSet::TKIP,
        VendorCipher::AesCcm => CipherSet::CCMP,
        VendorCipher::AesOcb => CipherSet::AESOCB,
        VendorCipher::Ckip => CipherSet::CKIP,
        VendorCipher::None => CipherSet::NONE,
        VendorCipher::Wep => match key_len {
            WEP104_KEY_LEN => CipherSet::WEP104,
            WEP40_KEY_LEN => CipherSet::WEP40,
            _ => CipherSet::empty(),
        },
        VendorCipher::TkipMic | VendorCipher::Unrecognized(_) => CipherSet::empty(),
    }
}

/// Pairwise cipher set from the driver's `1 << id` bitmask.
pub fn pairwise_ciphers(bitmask: u32, key_len: u32) -> CipherSet {
    VendorCipher::KNOWN
        .iter()
        .filter(|c| bitmask & (1 << c.id()) != 0)
        .fold(CipherSet::empty(), |set, &c| set | cipher_flag(c, key_len))
}

/// Group cipher set from the driver's single cipher id.
pub fn group_cipher(value: u32, key_len: u32) -> CipherSet {
    cipher_flag(VendorCipher::from_raw(value), key_len)
}

/// Build the encryption profile of `ifname`.
pub fn introspect(channel: &dyn ControlChannel, ifname: &InterfaceName) -> EncryptionProfile {
    let mut profile = EncryptionProfile::default();

    match send(channel, ifname, commands::cmd_read_group_key()) {
        Ok(reply) => {
            if commands::parse_key_type(reply.data()) == Some(VendorCipher::Wep.id() as u8) {
                profile.auth_algorithms = AuthAlgorithms::OPEN | AuthAlgorithms::SHARED;
            }
        }
        Err(e) => debug!(ifname = %ifname, error = %e, "key query failed"),
    }

    if let Some(version) = get_param(channel, ifname, Param::Wpa) {
        profile.wpa_version = version;
    }

    if let Some(mode) = get_param(channel, ifname, Param::AuthMode) {
        profile.auth_suite = Some(auth_suite_for(VendorAuthMode::from_raw(mode)));
    }

    let key_len = get_param(channel, ifname, Param::McastKeyLen).unwrap_or(0);

    if let Some(bitmask) = get_param(channel, ifname, Param::UcastCiphers) {
        profile.pairwise_ciphers = pairwise_ciphers(bitmask, key_len);
    }

    if let Some(value) = get_param(channel, ifname, Param::McastCipher) {
        profile.group_ciphers = group_cipher(value, key_len);
    }

    profile.refresh_enabled();
    profile
}
